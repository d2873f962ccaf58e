//! WiFi station management with blocking reconnect

#[cfg(target_os = "espidf")]
pub use self::esp::WifiManager;

/// Connection attempts per reconnect call before handing control back.
pub const MAX_CONNECT_ATTEMPTS: u32 = 3;
pub const CONNECT_RETRY_DELAY_MS: u64 = 3000;

#[cfg(target_os = "espidf")]
mod esp {
    use super::{CONNECT_RETRY_DELAY_MS, MAX_CONNECT_ATTEMPTS};
    use crate::system::config::NetworkConfig;
    use crate::traits::Network;
    use crate::wifi::NetworkError;
    use embassy_time::Instant;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::sys::EspError;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    pub struct WifiManager {
        wifi: BlockingWifi<EspWifi<'static>>,
    }

    fn driver_error(e: EspError) -> NetworkError {
        NetworkError::Driver(format!("{:?}", e))
    }

    impl WifiManager {
        pub fn new(
            modem: Modem,
            sys_loop: EspSystemEventLoop,
            nvs: EspDefaultNvsPartition,
            config: &NetworkConfig,
        ) -> Result<Self, NetworkError> {
            info!("🌐 Initializing WiFi Manager for '{}'", config.wifi_ssid);

            let wifi = EspWifi::new(modem, sys_loop.clone(), Some(nvs)).map_err(driver_error)?;
            let mut wifi = BlockingWifi::wrap(wifi, sys_loop).map_err(driver_error)?;

            let client = ClientConfiguration {
                ssid: config
                    .wifi_ssid
                    .as_str()
                    .try_into()
                    .map_err(|_| NetworkError::InvalidCredentials("SSID longer than 32 bytes"))?,
                password: config
                    .wifi_password
                    .as_str()
                    .try_into()
                    .map_err(|_| NetworkError::InvalidCredentials("password longer than 64 bytes"))?,
                auth_method: if config.wifi_password.is_empty() {
                    AuthMethod::None
                } else {
                    AuthMethod::WPA2Personal
                },
                ..Default::default()
            };

            wifi.set_configuration(&Configuration::Client(client))
                .map_err(driver_error)?;
            wifi.start().map_err(driver_error)?;

            Ok(Self { wifi })
        }

        fn connect_once(&mut self) -> Result<(), EspError> {
            self.wifi.connect()?;
            self.wifi.wait_netif_up()?;
            Ok(())
        }
    }

    impl Network for WifiManager {
        fn is_connected(&self) -> bool {
            self.wifi.is_connected().unwrap_or(false)
        }

        fn reconnect(&mut self) -> Result<(), NetworkError> {
            for attempt in 1..=MAX_CONNECT_ATTEMPTS {
                info!(
                    "🔌 WiFi connection attempt {}/{}",
                    attempt, MAX_CONNECT_ATTEMPTS
                );
                let connection_start = Instant::now();

                match self.connect_once() {
                    Ok(()) => {
                        info!(
                            "✅ WiFi connected in {}ms (attempt {})",
                            connection_start.elapsed().as_millis(),
                            attempt
                        );
                        return Ok(());
                    }
                    Err(e) => {
                        warn!(
                            "❌ WiFi connect failed after {}ms: {:?} (attempt {})",
                            connection_start.elapsed().as_millis(),
                            e,
                            attempt
                        );
                        if let Err(e) = self.wifi.disconnect() {
                            warn!("Failed to reset WiFi association: {:?}", e);
                        }
                        if attempt < MAX_CONNECT_ATTEMPTS {
                            std::thread::sleep(std::time::Duration::from_millis(
                                CONNECT_RETRY_DELAY_MS,
                            ));
                        }
                    }
                }
            }

            Err(NetworkError::Exhausted {
                attempts: MAX_CONNECT_ATTEMPTS,
            })
        }
    }
}
