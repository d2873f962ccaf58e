#[cfg(target_os = "espidf")]
use embassy_executor::Spawner;

#[cfg(target_os = "espidf")]
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("Starting pump alarm monitor");

    if let Err(e) = firmware::run().await {
        log::error!("Pump alarm monitor failed to start: {:?}", e);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    replay::run()
}

#[cfg(target_os = "espidf")]
mod firmware {
    use embassy_time::Timer;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::gpio::{IOPin, OutputPin};
    use esp_idf_svc::hal::prelude::Peripherals;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use log::info;
    use pump_alarm::hardware::{EmbassyClock, LedIndicator, PinSampler};
    use pump_alarm::notify::WebhookNotifier;
    use pump_alarm::system::{AlarmConfig, NetworkConfig};
    use pump_alarm::wifi::WifiManager;
    use pump_alarm::AlarmController;

    // GPIO4: pump relay contact, GPIO2: on-board LED
    pub async fn run() -> anyhow::Result<()> {
        let config = AlarmConfig::default();
        config.validate()?;
        let network_config = NetworkConfig::from_build_env()?;
        info!("Network configuration: {:?}", network_config);

        let peripherals = Peripherals::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        let sys_loop = EspSystemEventLoop::take()?;

        let wifi = WifiManager::new(peripherals.modem, sys_loop, nvs, &network_config)?;
        let sampler = PinSampler::new(peripherals.pins.gpio4.downgrade(), config.input_active_high)?;
        let indicator = LedIndicator::new(peripherals.pins.gpio2.downgrade_output())?;
        let notifier = WebhookNotifier::new(network_config);

        let mut controller =
            AlarmController::new(config, EmbassyClock, sampler, notifier, indicator, wifi);
        controller.start();

        info!("Entering monitor loop");
        loop {
            controller.tick();
            Timer::after(controller.cycle_interval()).await;
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod replay {
    use log::{debug, info};
    use pump_alarm::sim::{read_samples, AlwaysOnline, LogIndicator, LogNotifier, ScriptedSampler, VirtualClock};
    use pump_alarm::system::AlarmConfig;
    use pump_alarm::traits::Clock;
    use pump_alarm::AlarmController;

    /// Replay one sample per stdin line. Timings can be overridden with a JSON
    /// object in `PUMP_ALARM_TIMING`, e.g. `{"turn_on_delay_ms": 500}`.
    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let config = match std::env::var("PUMP_ALARM_TIMING") {
            Ok(json) => serde_json::from_str::<AlarmConfig>(&json)?,
            Err(_) => AlarmConfig::default(),
        };
        config.validate()?;
        info!("Replaying with {:?}", config);

        let clock = VirtualClock::default();
        let sampler = ScriptedSampler::default();
        let mut controller = AlarmController::new(
            config,
            clock.clone(),
            sampler.clone(),
            LogNotifier::default(),
            LogIndicator::default(),
            AlwaysOnline,
        );
        controller.start();

        for raw in read_samples(std::io::stdin().lock()) {
            sampler.set(raw);
            let report = controller.tick();
            if let Some(event) = report.event {
                info!("t={}ms {:?} -> {}", clock.now_ms(), event, report.state.as_str());
            } else if let Some(progress) = controller.debouncer().pending_progress(clock.now_ms()) {
                debug!(
                    "t={}ms {} {:.0}%",
                    clock.now_ms(),
                    report.state.as_str(),
                    progress * 100.0
                );
            }
            clock.advance(controller.cycle_interval());
        }

        let stats = controller.stats();
        info!(
            "Replay finished at t={}ms: state={}, {} notices sent, {} failed",
            clock.now_ms(),
            controller.state().as_str(),
            stats.sent,
            stats.failed
        );
        Ok(())
    }
}
