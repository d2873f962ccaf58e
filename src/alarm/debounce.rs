//! Debounce state machine for the monitored contact
//! States: Cleared, Confirming, Armed, Clearing
//!
//! A raw edge only starts (or cancels) a delay timer. The confirmed state
//! changes, and an event is emitted, only once the new level has held for the
//! full turn-on or turn-off delay.

use crate::system::config::AlarmConfig;
use crate::types::{AlarmState, RawSample, Timestamp, TransitionEvent};
use embassy_time::Duration;
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayTimer {
    running: bool,
    started_at: Timestamp,
    threshold: Duration,
}

impl DelayTimer {
    pub const fn new(threshold: Duration) -> Self {
        Self {
            running: false,
            started_at: 0,
            threshold,
        }
    }

    pub fn start(&mut self, now: Timestamp) {
        self.running = true;
        self.started_at = now;
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Milliseconds since the timer was started, correct across clock wrap.
    pub fn elapsed_ms(&self, now: Timestamp) -> Option<u32> {
        self.running.then(|| now.wrapping_sub(self.started_at))
    }

    pub fn has_expired(&self, now: Timestamp) -> bool {
        self.elapsed_ms(now)
            .is_some_and(|elapsed| u64::from(elapsed) >= self.threshold.as_millis())
    }
}

/// Confirmed state plus the two delay timers that refine it.
///
/// `step` is a pure function of `(self, raw, now)`. The turn-on timer only runs
/// in `Confirming` and the turn-off timer only in `Clearing`, so the two are
/// never running together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceState {
    state: AlarmState,
    turn_on: DelayTimer,
    turn_off: DelayTimer,
}

impl DebounceState {
    pub const fn new(turn_on_delay: Duration, turn_off_delay: Duration) -> Self {
        Self {
            state: AlarmState::Cleared,
            turn_on: DelayTimer::new(turn_on_delay),
            turn_off: DelayTimer::new(turn_off_delay),
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn turn_on_timer(&self) -> &DelayTimer {
        &self.turn_on
    }

    pub fn turn_off_timer(&self) -> &DelayTimer {
        &self.turn_off
    }

    pub fn step(self, raw: RawSample, now: Timestamp) -> (Self, Option<TransitionEvent>) {
        let mut next = self;

        // Edges. Each state implies the previous raw level: Confirming and
        // Armed were last fed `true`, Cleared and Clearing were last fed `false`.
        match (self.state, raw) {
            (AlarmState::Cleared, true) => {
                next.turn_off.cancel();
                next.turn_on.start(now);
                next.state = AlarmState::Confirming;
            }
            (AlarmState::Confirming, false) => {
                next.turn_on.cancel();
                next.state = AlarmState::Cleared;
            }
            (AlarmState::Armed, false) => {
                next.turn_on.cancel();
                next.turn_off.start(now);
                next.state = AlarmState::Clearing;
            }
            (AlarmState::Clearing, true) => {
                next.turn_off.cancel();
                next.state = AlarmState::Armed;
            }
            _ => {}
        }

        // Level checks run every cycle, after any edge in the same cycle
        let event = match next.state {
            AlarmState::Confirming if next.turn_on.has_expired(now) => {
                next.turn_on.cancel();
                next.state = AlarmState::Armed;
                Some(TransitionEvent::EnteredAlarm)
            }
            AlarmState::Clearing if next.turn_off.has_expired(now) => {
                next.turn_off.cancel();
                next.state = AlarmState::Cleared;
                Some(TransitionEvent::ClearedAlarm)
            }
            _ => None,
        };

        (next, event)
    }
}

pub struct Debouncer {
    current: DebounceState,
}

impl Debouncer {
    pub fn new(turn_on_delay: Duration, turn_off_delay: Duration) -> Self {
        Self {
            current: DebounceState::new(turn_on_delay, turn_off_delay),
        }
    }

    pub fn from_config(config: &AlarmConfig) -> Self {
        Self::new(config.turn_on_delay(), config.turn_off_delay())
    }

    pub fn update(&mut self, raw: RawSample, now: Timestamp) -> Option<TransitionEvent> {
        let previous = self.current.state();
        let (next, event) = self.current.step(raw, now);

        if next.state() != previous {
            debug!(
                "Debounce transition: {:?} -> {:?} at {}ms",
                previous,
                next.state(),
                now
            );
        }
        match event {
            Some(TransitionEvent::EnteredAlarm) => {
                info!("Alarm confirmed after {}ms", self.current.turn_on.threshold().as_millis());
            }
            Some(TransitionEvent::ClearedAlarm) => {
                info!("Alarm cleared after {}ms", self.current.turn_off.threshold().as_millis());
            }
            None => {}
        }

        self.current = next;
        event
    }

    pub fn state(&self) -> AlarmState {
        self.current.state()
    }

    pub fn is_armed(&self) -> bool {
        self.current.state() == AlarmState::Armed
    }

    pub fn snapshot(&self) -> DebounceState {
        self.current
    }

    /// Fraction of the pending delay already served, if a timer is running.
    pub fn pending_progress(&self, now: Timestamp) -> Option<f32> {
        let timer = match self.current.state() {
            AlarmState::Confirming => self.current.turn_on_timer(),
            AlarmState::Clearing => self.current.turn_off_timer(),
            _ => return None,
        };
        let elapsed = timer.elapsed_ms(now)?;
        let threshold = timer.threshold().as_millis();
        if threshold == 0 {
            return Some(1.0);
        }
        let progress = elapsed as f32 / threshold as f32;
        Some(progress.min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TON: Duration = Duration::from_millis(1800);
    const TOF: Duration = Duration::from_millis(1600);

    fn armed_at(now: Timestamp) -> Debouncer {
        let mut debouncer = Debouncer::new(TON, TOF);
        debouncer.update(true, now);
        assert_eq!(
            debouncer.update(true, now.wrapping_add(1800)),
            Some(TransitionEvent::EnteredAlarm)
        );
        debouncer
    }

    /// Feed `raw` every 100ms over `[from, to]` and collect emitted events.
    fn hold(debouncer: &mut Debouncer, raw: bool, from: u32, to: u32) -> Vec<TransitionEvent> {
        (from..=to)
            .step_by(100)
            .filter_map(|t| debouncer.update(raw, t))
            .collect()
    }

    #[test]
    fn test_starts_cleared() {
        let debouncer = Debouncer::new(TON, TOF);
        assert_eq!(debouncer.state(), AlarmState::Cleared);
        assert!(!debouncer.snapshot().turn_on_timer().is_running());
        assert!(!debouncer.snapshot().turn_off_timer().is_running());
    }

    #[test]
    fn test_scenario_a_alarm_confirmed_once() {
        let mut debouncer = Debouncer::new(TON, TOF);

        let events = hold(&mut debouncer, true, 0, 1700);
        assert!(events.is_empty());
        assert_eq!(debouncer.state(), AlarmState::Confirming);

        assert_eq!(debouncer.update(true, 1800), Some(TransitionEvent::EnteredAlarm));
        assert_eq!(debouncer.state(), AlarmState::Armed);

        let events = hold(&mut debouncer, true, 1900, 10_000);
        assert!(events.is_empty());
        assert_eq!(debouncer.state(), AlarmState::Armed);
    }

    #[test]
    fn test_scenario_b_flip_back_while_clearing() {
        let mut debouncer = armed_at(0);

        let events = hold(&mut debouncer, false, 2000, 2900);
        assert!(events.is_empty());
        assert_eq!(debouncer.state(), AlarmState::Clearing);

        assert_eq!(debouncer.update(true, 3000), None);
        assert_eq!(debouncer.state(), AlarmState::Armed);
        assert!(!debouncer.snapshot().turn_off_timer().is_running());
    }

    #[test]
    fn test_scenario_c_alarm_cleared_after_turn_off_delay() {
        let mut debouncer = armed_at(0);

        let events = hold(&mut debouncer, false, 2000, 3500);
        assert!(events.is_empty());

        assert_eq!(debouncer.update(false, 3600), Some(TransitionEvent::ClearedAlarm));
        assert_eq!(debouncer.state(), AlarmState::Cleared);
        assert!(hold(&mut debouncer, false, 3700, 8000).is_empty());
    }

    #[test]
    fn test_scenario_d_short_pulse_ignored() {
        let mut debouncer = Debouncer::new(TON, TOF);

        assert!(hold(&mut debouncer, true, 0, 400).is_empty());
        assert_eq!(debouncer.update(false, 500), None);
        assert_eq!(debouncer.state(), AlarmState::Cleared);
        assert!(!debouncer.snapshot().turn_on_timer().is_running());
    }

    #[test]
    fn test_restarted_timer_measures_from_new_edge() {
        let mut debouncer = Debouncer::new(TON, TOF);

        hold(&mut debouncer, true, 0, 1000);
        debouncer.update(false, 1100);
        hold(&mut debouncer, true, 1200, 2900);
        // Measured from the second edge at 1200, not the first at 0
        assert_eq!(debouncer.state(), AlarmState::Confirming);
        assert_eq!(debouncer.update(true, 3000), Some(TransitionEvent::EnteredAlarm));
    }

    #[test]
    fn test_first_sample_true_starts_confirmation() {
        let mut debouncer = Debouncer::new(TON, TOF);
        assert_eq!(debouncer.update(true, 5_000), None);
        assert_eq!(debouncer.state(), AlarmState::Confirming);
        assert_eq!(debouncer.snapshot().turn_on_timer().started_at(), Some(5_000));
    }

    #[test]
    fn test_repeated_false_while_cleared_is_idle() {
        let mut debouncer = Debouncer::new(TON, TOF);
        let before = debouncer.snapshot();
        assert!(hold(&mut debouncer, false, 0, 5_000).is_empty());
        assert_eq!(debouncer.snapshot(), before);
    }

    #[test]
    fn test_zero_delay_confirms_on_edge() {
        let mut debouncer = Debouncer::new(Duration::from_millis(0), Duration::from_millis(0));
        assert_eq!(debouncer.update(true, 10), Some(TransitionEvent::EnteredAlarm));
        assert_eq!(debouncer.update(false, 20), Some(TransitionEvent::ClearedAlarm));
    }

    #[test]
    fn test_timer_survives_clock_wrap() {
        let start = u32::MAX - 500;
        let mut debouncer = Debouncer::new(TON, TOF);

        debouncer.update(true, start);
        assert_eq!(debouncer.update(true, start.wrapping_add(1000)), None);
        assert_eq!(
            debouncer.snapshot().turn_on_timer().elapsed_ms(start.wrapping_add(1000)),
            Some(1000)
        );
        assert_eq!(
            debouncer.update(true, start.wrapping_add(1800)),
            Some(TransitionEvent::EnteredAlarm)
        );
    }

    #[test]
    fn test_pending_progress() {
        let mut debouncer = Debouncer::new(TON, TOF);
        assert_eq!(debouncer.pending_progress(0), None);

        debouncer.update(true, 0);
        let progress = debouncer.pending_progress(900).unwrap();
        assert!((progress - 0.5).abs() < 0.01);
        assert_eq!(debouncer.pending_progress(5_000), Some(1.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_sample() -> impl Strategy<Value = (bool, u16)> {
        (
            any::<bool>(), // raw level
            1u16..400,     // gap to the previous sample, ms
        )
    }

    proptest! {
        #[test]
        fn events_respect_delays_and_alternate(
            start in any::<u32>(),
            samples in proptest::collection::vec(arb_sample(), 1..400),
        ) {
            let mut debouncer = Debouncer::new(Duration::from_millis(1800), Duration::from_millis(1600));
            let mut now = start;
            let mut raw = false;
            let mut raw_since = now;
            let mut last_event: Option<TransitionEvent> = None;

            for (sample, gap) in samples {
                now = now.wrapping_add(u32::from(gap));
                if sample != raw {
                    raw = sample;
                    raw_since = now;
                }

                let before = debouncer.state();
                let event = debouncer.update(raw, now);
                let snapshot = debouncer.snapshot();

                prop_assert!(
                    !(snapshot.turn_on_timer().is_running() && snapshot.turn_off_timer().is_running()),
                    "both timers running"
                );

                match event {
                    Some(TransitionEvent::EnteredAlarm) => {
                        prop_assert!(raw);
                        prop_assert!(matches!(before, AlarmState::Cleared | AlarmState::Confirming));
                        prop_assert!(now.wrapping_sub(raw_since) >= 1800);
                        prop_assert_ne!(last_event, Some(TransitionEvent::EnteredAlarm));
                        prop_assert_eq!(debouncer.state(), AlarmState::Armed);
                        last_event = event;
                    }
                    Some(TransitionEvent::ClearedAlarm) => {
                        prop_assert!(!raw);
                        prop_assert!(matches!(before, AlarmState::Armed | AlarmState::Clearing));
                        prop_assert!(now.wrapping_sub(raw_since) >= 1600);
                        prop_assert_eq!(last_event, Some(TransitionEvent::EnteredAlarm));
                        prop_assert_eq!(debouncer.state(), AlarmState::Cleared);
                        last_event = event;
                    }
                    None => {}
                }
            }
        }
    }
}
