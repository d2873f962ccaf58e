pub mod alarm;
pub mod controller;
pub mod hardware;
pub mod notify;
#[cfg(any(test, not(target_os = "espidf")))]
pub mod sim;
pub mod system;
pub mod traits;
pub mod types;
pub mod wifi;

pub use controller::*;
pub use types::*;
