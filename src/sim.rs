//! Host-side collaborators for replaying captured contact traces
//!
//! The replay binary feeds one sample per cycle into the same controller the
//! firmware runs, with a virtual clock that advances by the cycle interval.

use crate::hardware::indicator::BlinkPattern;
use crate::notify::NotifyError;
use crate::traits::{Clock, Indicator, InputSampler, Network, Notifier};
use crate::types::{RawSample, Timestamp};
use crate::wifi::NetworkError;
use embassy_time::Duration;
use log::{info, warn};
use std::io::BufRead;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct VirtualClock(Rc<Cell<Timestamp>>);

impl VirtualClock {
    pub fn advance(&self, by: Duration) {
        let by = by.as_millis() as Timestamp;
        self.0.set(self.0.get().wrapping_add(by));
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> Timestamp {
        self.0.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler(Rc<Cell<RawSample>>);

impl ScriptedSampler {
    pub fn set(&self, raw: RawSample) {
        self.0.set(raw);
    }
}

impl InputSampler for ScriptedSampler {
    fn read(&mut self) -> RawSample {
        self.0.get()
    }
}

/// Logs what would have gone out and reports success.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&mut self, label: &str) -> Result<(), NotifyError> {
        info!("[notify] {}", label);
        Ok(())
    }
}

/// Logs only when the pattern changes.
#[derive(Debug, Default)]
pub struct LogIndicator {
    last: Option<BlinkPattern>,
}

impl Indicator for LogIndicator {
    fn set_pattern(&mut self, pattern: BlinkPattern) {
        if self.last != Some(pattern) {
            if pattern.blink {
                info!("[indicator] blinking every {}ms", pattern.period.as_millis());
            } else {
                info!("[indicator] off");
            }
            self.last = Some(pattern);
        }
    }
}

#[derive(Debug, Default)]
pub struct AlwaysOnline;

impl Network for AlwaysOnline {
    fn is_connected(&self) -> bool {
        true
    }

    fn reconnect(&mut self) -> Result<(), NetworkError> {
        Ok(())
    }
}

/// Accepts `1`/`0`, `true`/`false`, `open`/`closed`, `high`/`low`.
pub fn parse_sample(token: &str) -> Option<RawSample> {
    match token.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "open" | "high" => Some(true),
        "0" | "false" | "closed" | "low" => Some(false),
        _ => None,
    }
}

/// Samples from a line-oriented trace. Blank lines and `#` comments are
/// ignored; unreadable or unrecognized lines are skipped with a warning.
pub fn read_samples<R: BufRead>(reader: R) -> impl Iterator<Item = RawSample> {
    reader.lines().enumerate().filter_map(|(index, line)| {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("line {}: unreadable input ({}), skipping", index + 1, e);
                return None;
            }
        };
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            return None;
        }
        let raw = parse_sample(token);
        if raw.is_none() {
            warn!("line {}: unrecognized sample '{}'", index + 1, token);
        }
        raw
    })
}
