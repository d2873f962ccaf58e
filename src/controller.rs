use crate::{
    alarm::{Debouncer, LinkMonitor, LinkOutput, LinkStatus},
    hardware::indicator::BlinkPattern,
    system::config::AlarmConfig,
    traits::{Clock, Indicator, InputSampler, Network, Notifier},
    types::{AlarmState, Notice, NoticeOutcome, RawSample, TransitionEvent},
};
use embassy_time::Duration;
use log::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub sent: u32,
    pub failed: u32,
}

/// What happened during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub raw: RawSample,
    pub state: AlarmState,
    pub event: Option<TransitionEvent>,
    pub notices: heapless::Vec<NoticeOutcome, 2>,
    pub network_up: bool,
}

/// Drives one sample -> debounce -> notify -> indicate -> network cycle.
///
/// Owns the debouncer and link monitor outright; the collaborators are the
/// only things that touch hardware or the network. Pacing between cycles is
/// left to the caller.
pub struct AlarmController<C, S, N, I, W>
where
    C: Clock,
    S: InputSampler,
    N: Notifier,
    I: Indicator,
    W: Network,
{
    config: AlarmConfig,
    clock: C,
    sampler: S,
    notifier: N,
    indicator: I,
    network: W,

    debouncer: Debouncer,
    link: LinkMonitor,
    stats: DispatchStats,
}

impl<C, S, N, I, W> AlarmController<C, S, N, I, W>
where
    C: Clock,
    S: InputSampler,
    N: Notifier,
    I: Indicator,
    W: Network,
{
    pub fn new(config: AlarmConfig, clock: C, sampler: S, notifier: N, indicator: I, network: W) -> Self {
        let debouncer = Debouncer::from_config(&config);

        Self {
            config,
            clock,
            sampler,
            notifier,
            indicator,
            network,
            debouncer,
            link: LinkMonitor::new(),
            stats: DispatchStats::default(),
        }
    }

    /// Block until the network is up, then send the power-on notice.
    pub fn start(&mut self) -> NoticeOutcome {
        info!(
            "Starting alarm controller (turn-on {}ms, turn-off {}ms, cycle {}ms)",
            self.config.turn_on_delay_ms, self.config.turn_off_delay_ms, self.config.cycle_interval_ms
        );

        self.wait_for_network();
        self.link.observe(true);

        self.notify(Notice::PowerOn)
    }

    pub fn tick(&mut self) -> CycleReport {
        let raw = self.sampler.read();
        let now = self.clock.now_ms();
        let mut notices = heapless::Vec::new();

        let event = self.debouncer.update(raw, now);
        if let Some(event) = event {
            let _ = notices.push(self.notify(event.notice()));
        }

        let state = self.debouncer.state();
        self.indicator
            .set_pattern(BlinkPattern::for_state(state, self.config.blink_interval()));

        let network_up = self.supervise_network(&mut notices);

        CycleReport {
            raw,
            state,
            event,
            notices,
            network_up,
        }
    }

    pub fn cycle_interval(&self) -> Duration {
        self.config.cycle_interval()
    }

    pub fn state(&self) -> AlarmState {
        self.debouncer.state()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn link_status(&self) -> LinkStatus {
        self.link.status()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    fn wait_for_network(&mut self) {
        let mut attempts = 0u32;
        while !self.network.is_connected() {
            attempts += 1;
            match self.network.reconnect() {
                Ok(()) => break,
                Err(e) => warn!("Network not available yet ({}), retry #{}", e, attempts),
            }
        }
        info!("Network available");
    }

    /// Debounce timers keep running while this blocks.
    fn supervise_network(&mut self, notices: &mut heapless::Vec<NoticeOutcome, 2>) -> bool {
        let mut connected = self.network.is_connected();

        if !connected {
            self.link.observe(false);
            match self.network.reconnect() {
                Ok(()) => connected = true,
                Err(e) => warn!("Reconnect failed: {} - retrying next cycle", e),
            }
        }

        if connected {
            if let Some(LinkOutput::AnnounceRestored) = self.link.observe(true) {
                info!("Network restored after outage #{}", self.link.outages());
                let _ = notices.push(self.notify(Notice::NetworkRestored));
            }
        }

        connected
    }

    fn notify(&mut self, notice: Notice) -> NoticeOutcome {
        let label = notice.label();
        debug!("📣 Sending notice: {}", label);

        match self.notifier.send(label) {
            Ok(()) => {
                self.stats.sent += 1;
                info!("✅ Notice delivered: {}", label);
                NoticeOutcome::Sent(notice)
            }
            Err(e) => {
                self.stats.failed += 1;
                error!(
                    "❌ Notice '{}' not delivered: {} ({} failed so far)",
                    label, e, self.stats.failed
                );
                NoticeOutcome::Failed(notice)
            }
        }
    }
}
