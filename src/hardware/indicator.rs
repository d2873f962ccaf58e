use crate::types::{AlarmState, Timestamp};
use embassy_time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPattern {
    pub blink: bool,
    pub period: Duration,
}

impl BlinkPattern {
    pub const OFF: BlinkPattern = BlinkPattern {
        blink: false,
        period: Duration::from_millis(0),
    };

    /// Blinking iff the alarm is confirmed, steady off otherwise.
    pub fn for_state(state: AlarmState, blink_interval: Duration) -> Self {
        if state == AlarmState::Armed {
            Self {
                blink: true,
                period: blink_interval,
            }
        } else {
            Self::OFF
        }
    }

    /// LED level at `now`: lit for one period, dark for the next.
    pub fn level_at(&self, now: Timestamp) -> bool {
        let period = self.period.as_millis();
        if !self.blink || period == 0 {
            return false;
        }
        (u64::from(now) / period) % 2 == 0
    }
}

#[cfg(target_os = "espidf")]
pub use self::esp::LedIndicator;

#[cfg(target_os = "espidf")]
mod esp {
    use super::BlinkPattern;
    use crate::hardware::HardwareError;
    use crate::traits::Indicator;
    use embassy_time::Instant;
    use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};
    use log::{info, warn};

    pub struct LedIndicator {
        pin: PinDriver<'static, AnyOutputPin, Output>,
        lit: bool,
    }

    impl LedIndicator {
        pub fn new(pin: AnyOutputPin) -> Result<Self, HardwareError> {
            let mut pin = PinDriver::output(pin)
                .map_err(|e| HardwareError::Gpio(format!("Failed to configure LED pin: {:?}", e)))?;

            // LED starts dark
            pin.set_low().map_err(|e| {
                HardwareError::Gpio(format!("Failed to set initial low state: {:?}", e))
            })?;

            info!("Alarm indicator initialized (active high)");

            Ok(Self { pin, lit: false })
        }

        fn drive(&mut self, lit: bool) -> Result<(), HardwareError> {
            if lit == self.lit {
                return Ok(());
            }

            let result = if lit {
                self.pin.set_high()
            } else {
                self.pin.set_low()
            };
            result.map_err(|e| HardwareError::Gpio(format!("Failed to drive LED: {:?}", e)))?;

            self.lit = lit;
            Ok(())
        }
    }

    impl Indicator for LedIndicator {
        fn set_pattern(&mut self, pattern: BlinkPattern) {
            let now = Instant::now().as_millis() as u32;
            if let Err(e) = self.drive(pattern.level_at(now)) {
                warn!("{}", e);
            }
        }
    }
}
