pub mod clock;
pub mod indicator;
pub mod input;

#[cfg(target_os = "espidf")]
pub use clock::*;
pub use indicator::*;
pub use input::*;

#[derive(Debug, Clone)]
pub enum HardwareError {
    Gpio(String),
}

impl std::fmt::Display for HardwareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardwareError::Gpio(msg) => write!(f, "GPIO error: {}", msg),
        }
    }
}

impl std::error::Error for HardwareError {}
