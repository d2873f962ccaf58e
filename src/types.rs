use serde::{Deserialize, Serialize};

/// Milliseconds since boot. Wraps after ~49 days, so elapsed time is always
/// computed with `wrapping_sub`.
pub type Timestamp = u32;

/// One instantaneous read of the monitored line. `true` means the triggering
/// condition is present (contact open).
pub type RawSample = bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmState {
    Cleared,
    Confirming,
    Armed,
    Clearing,
}

impl AlarmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmState::Cleared => "cleared",
            AlarmState::Confirming => "confirming",
            AlarmState::Armed => "armed",
            AlarmState::Clearing => "clearing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionEvent {
    EnteredAlarm,
    ClearedAlarm,
}

impl TransitionEvent {
    pub fn notice(&self) -> Notice {
        match self {
            TransitionEvent::EnteredAlarm => Notice::AlarmEntered,
            TransitionEvent::ClearedAlarm => Notice::AlarmCleared,
        }
    }
}

/// Every notification the device can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    PowerOn,
    NetworkRestored,
    AlarmEntered,
    AlarmCleared,
}

impl Notice {
    pub fn label(&self) -> &'static str {
        match self {
            Notice::PowerOn => "Pump monitor powered on",
            Notice::NetworkRestored => "Pump monitor network restored",
            Notice::AlarmEntered => "Pump alarm ON",
            Notice::AlarmCleared => "Pump alarm cleared",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeOutcome {
    Sent(Notice),
    Failed(Notice),
}

pub const DEFAULT_TURN_ON_DELAY_MS: u64 = 1800;
pub const DEFAULT_TURN_OFF_DELAY_MS: u64 = 1600;
pub const DEFAULT_CYCLE_INTERVAL_MS: u64 = 100;
pub const DEFAULT_BLINK_INTERVAL_MS: u64 = 100;
pub const NOTIFY_OK_STATUS: u16 = 200;
