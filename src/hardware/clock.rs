#[cfg(target_os = "espidf")]
pub use self::esp::EmbassyClock;

#[cfg(target_os = "espidf")]
mod esp {
    use crate::traits::Clock;
    use crate::types::Timestamp;
    use embassy_time::Instant;

    /// Milliseconds since boot from the embassy time driver, truncated to the
    /// wrapping `u32` the debouncer works in.
    pub struct EmbassyClock;

    impl Clock for EmbassyClock {
        fn now_ms(&self) -> Timestamp {
            Instant::now().as_millis() as Timestamp
        }
    }
}
