pub mod debounce;
pub mod link;

pub use debounce::*;
pub use link::*;
