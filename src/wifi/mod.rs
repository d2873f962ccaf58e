pub mod manager;

pub use manager::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    Driver(String),
    InvalidCredentials(&'static str),
    Exhausted { attempts: u32 },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::Driver(msg) => write!(f, "WiFi driver error: {}", msg),
            NetworkError::InvalidCredentials(msg) => write!(f, "invalid WiFi credentials: {}", msg),
            NetworkError::Exhausted { attempts } => {
                write!(f, "WiFi still down after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for NetworkError {}
