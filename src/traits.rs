//! Collaborator traits for the cycle controller
//!
//! The controller only talks to hardware and the network through these, so the
//! ESP-IDF drivers and the host fakes are interchangeable.

use crate::hardware::indicator::BlinkPattern;
use crate::notify::NotifyError;
use crate::types::{RawSample, Timestamp};
use crate::wifi::NetworkError;

/// Monotonic millisecond clock. Readings wrap at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> Timestamp;
}

/// Instantaneous, undebounced read of the monitored line.
pub trait InputSampler {
    fn read(&mut self) -> RawSample;
}

/// Outbound notification channel. May block while the request is in flight.
pub trait Notifier {
    fn send(&mut self, label: &str) -> Result<(), NotifyError>;
}

/// Visual alarm indicator. Purely an output, never read back.
pub trait Indicator {
    fn set_pattern(&mut self, pattern: BlinkPattern);
}

pub trait Network {
    fn is_connected(&self) -> bool;

    /// Block until the link is back or the attempt budget is spent.
    fn reconnect(&mut self) -> Result<(), NetworkError>;
}
