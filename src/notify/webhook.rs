//! Webhook notifier backed by the ESP-IDF HTTP client

#[cfg(target_os = "espidf")]
pub use self::esp::WebhookNotifier;

#[cfg(target_os = "espidf")]
mod esp {
    use crate::notify::{classify_status, NotifyError, WebhookRequest};
    use crate::system::config::NetworkConfig;
    use crate::traits::Notifier;
    use embedded_svc::http::client::Client as HttpClient;
    use embedded_svc::http::Status;
    use embedded_svc::io::Write;
    use esp_idf_svc::http::client::{Configuration as HttpClientConfiguration, EspHttpConnection};
    use log::{debug, info};
    use std::time::Duration;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub struct WebhookNotifier {
        config: NetworkConfig,
    }

    impl WebhookNotifier {
        pub fn new(config: NetworkConfig) -> Self {
            info!(
                "Webhook notifier targeting {} (event '{}')",
                config.webhook_base_url, config.webhook_event
            );
            Self { config }
        }

        fn transport<E: std::fmt::Debug>(e: E) -> NotifyError {
            NotifyError::Transport(format!("{:?}", e))
        }
    }

    impl Notifier for WebhookNotifier {
        fn send(&mut self, label: &str) -> Result<(), NotifyError> {
            let request = WebhookRequest::new(&self.config, label)?;

            let http_conf = HttpClientConfiguration {
                timeout: Some(REQUEST_TIMEOUT),
                crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
                ..Default::default()
            };
            // One connection per notice
            let connection = EspHttpConnection::new(&http_conf).map_err(Self::transport)?;
            let mut client = HttpClient::wrap(connection);

            let content_length = request.body.len().to_string();
            let headers = [
                ("Content-Type", "application/json"),
                ("Content-Length", content_length.as_str()),
            ];

            let mut outgoing = client
                .post(&request.url, &headers)
                .map_err(Self::transport)?;
            outgoing
                .write_all(request.body.as_bytes())
                .map_err(Self::transport)?;
            outgoing.flush().map_err(Self::transport)?;

            let response = outgoing.submit().map_err(Self::transport)?;
            let status = response.status();
            debug!("Webhook '{}' answered HTTP {}", label, status);

            classify_status(status)
        }
    }
}
