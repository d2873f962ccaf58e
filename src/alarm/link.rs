//! Network link supervision
//! States: Connecting, Online, Offline
//!
//! Decides when the "network restored" notice is due. The first link-up after
//! boot is covered by the power-on notice, so only recovery from a real outage
//! announces.

use heapless::Vec;
use log::{info, warn};
use statig::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkInput {
    LinkUp,
    LinkDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutput {
    AnnounceRestored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Connecting,
    Online,
    Offline,
}

#[derive(Debug, Default)]
pub struct LinkContext {
    outages: u32,
    outputs: Vec<LinkOutput, 2>,
}

#[derive(Debug, Default)]
pub struct LinkStateMachine;

#[state_machine(
    initial = "State::connecting()",
    state(derive(Debug)),
    on_transition = "Self::on_transition"
)]
impl LinkStateMachine {
    /// Booted, link not seen yet
    #[state]
    fn connecting(event: &LinkInput) -> Response<State> {
        use Response::*;

        match event {
            LinkInput::LinkUp => Transition(State::online()),
            LinkInput::LinkDown => Handled,
        }
    }

    #[state]
    fn online(context: &mut LinkContext, event: &LinkInput) -> Response<State> {
        use Response::*;

        match event {
            LinkInput::LinkDown => {
                context.outages += 1;
                warn!("📡 Network link lost (outage #{})", context.outages);
                Transition(State::offline())
            }
            LinkInput::LinkUp => Handled,
        }
    }

    #[state]
    fn offline(context: &mut LinkContext, event: &LinkInput) -> Response<State> {
        use Response::*;

        match event {
            LinkInput::LinkUp => {
                let _ = context.outputs.push(LinkOutput::AnnounceRestored);
                Transition(State::online())
            }
            LinkInput::LinkDown => Handled,
        }
    }
}

impl LinkStateMachine {
    fn on_transition(&mut self, source: &State, target: &State) {
        info!(
            "🔄 Link state transition: {:?} -> {:?}",
            Self::state_to_link_status(source),
            Self::state_to_link_status(target)
        );
    }

    fn state_to_link_status(state: &State) -> LinkStatus {
        match state {
            State::Connecting {} => LinkStatus::Connecting,
            State::Online {} => LinkStatus::Online,
            State::Offline {} => LinkStatus::Offline,
        }
    }
}

pub struct LinkMonitor {
    machine: statig::prelude::StateMachine<LinkStateMachine>,
    context: LinkContext,
}

impl LinkMonitor {
    pub fn new() -> Self {
        Self {
            machine: LinkStateMachine::default().state_machine(),
            context: LinkContext::default(),
        }
    }

    /// Feed one connectivity observation and return what, if anything, to announce.
    pub fn observe(&mut self, connected: bool) -> Option<LinkOutput> {
        self.context.outputs.clear();

        let input = if connected {
            LinkInput::LinkUp
        } else {
            LinkInput::LinkDown
        };
        self.machine.handle_with_context(&input, &mut self.context);

        self.context.outputs.first().copied()
    }

    pub fn status(&self) -> LinkStatus {
        LinkStateMachine::state_to_link_status(self.machine.state())
    }

    pub fn outages(&self) -> u32 {
        self.context.outages
    }
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_link_up_is_silent() {
        let mut monitor = LinkMonitor::new();
        assert_eq!(monitor.status(), LinkStatus::Connecting);

        assert_eq!(monitor.observe(false), None);
        assert_eq!(monitor.status(), LinkStatus::Connecting);

        assert_eq!(monitor.observe(true), None);
        assert_eq!(monitor.status(), LinkStatus::Online);
        assert_eq!(monitor.outages(), 0);
    }

    #[test]
    fn test_recovery_announces_once() {
        let mut monitor = LinkMonitor::new();
        monitor.observe(true);

        assert_eq!(monitor.observe(false), None);
        assert_eq!(monitor.status(), LinkStatus::Offline);
        assert_eq!(monitor.observe(false), None);

        assert_eq!(monitor.observe(true), Some(LinkOutput::AnnounceRestored));
        assert_eq!(monitor.observe(true), None);
        assert_eq!(monitor.outages(), 1);
    }

    #[test]
    fn test_counts_each_outage() {
        let mut monitor = LinkMonitor::new();
        for _ in 0..3 {
            monitor.observe(true);
            monitor.observe(false);
        }
        assert_eq!(monitor.outages(), 3);
        assert_eq!(monitor.status(), LinkStatus::Offline);
    }
}
