use crate::types::RawSample;

/// Map a pin level to the triggering condition.
pub fn contact_open(level_high: bool, active_high: bool) -> RawSample {
    level_high == active_high
}

#[cfg(target_os = "espidf")]
pub use self::esp::PinSampler;

#[cfg(target_os = "espidf")]
mod esp {
    use super::contact_open;
    use crate::hardware::HardwareError;
    use crate::traits::InputSampler;
    use crate::types::RawSample;
    use esp_idf_svc::hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
    use log::info;

    pub struct PinSampler {
        pin: PinDriver<'static, AnyIOPin, Input>,
        active_high: bool,
    }

    impl PinSampler {
        pub fn new(pin: AnyIOPin, active_high: bool) -> Result<Self, HardwareError> {
            let mut pin = PinDriver::input(pin).map_err(|e| {
                HardwareError::Gpio(format!("Failed to configure input pin: {:?}", e))
            })?;

            // An open contact floats to the active level
            let pull = if active_high { Pull::Up } else { Pull::Down };
            pin.set_pull(pull)
                .map_err(|e| HardwareError::Gpio(format!("Failed to set pull: {:?}", e)))?;

            info!(
                "Contact input initialized (open = {})",
                if active_high { "HIGH" } else { "LOW" }
            );

            Ok(Self { pin, active_high })
        }
    }

    impl InputSampler for PinSampler {
        fn read(&mut self) -> RawSample {
            contact_open(self.pin.is_high(), self.active_high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_polarity() {
        assert!(contact_open(true, true));
        assert!(!contact_open(false, true));
        assert!(contact_open(false, false));
        assert!(!contact_open(true, false));
    }
}
