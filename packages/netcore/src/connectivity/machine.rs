use statig::prelude::*;

use super::engine::ApplyStatus;
use super::state::{ConnectivityState, LinkAction, LinkEvent, LinkSnapshot};

#[derive(Clone, Copy, Debug)]
pub(super) struct ConnectivityMachine {
    pub(super) snapshot: LinkSnapshot,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) status: ApplyStatus,
    pub(super) action: Option<LinkAction>,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            status: ApplyStatus::Unchanged,
            action: None,
        }
    }
}

impl ConnectivityMachine {
    pub(super) fn new() -> Self {
        Self {
            snapshot: LinkSnapshot::default(),
        }
    }

    fn begin_reconnect(&mut self, context: &mut DispatchContext) {
        let attempt = self.snapshot.reconnect_attempts.saturating_add(1);
        self.snapshot.reconnect_attempts = attempt;
        self.snapshot.address = None;
        self.snapshot.state = ConnectivityState::Connecting;
        context.status = ApplyStatus::Applied;
        context.action = Some(LinkAction::Reconnect { attempt });
    }
}

#[state_machine(initial = "State::disconnected()")]
impl ConnectivityMachine {
    #[state]
    fn disconnected(&mut self, context: &mut DispatchContext, event: &LinkEvent) -> Outcome<State> {
        match event {
            LinkEvent::LinkStarted => {
                self.snapshot.state = ConnectivityState::Connecting;
                context.status = ApplyStatus::Applied;
                context.action = Some(LinkAction::Connect);
                Transition(State::connecting())
            }
            LinkEvent::LinkLost { .. } => {
                self.begin_reconnect(context);
                Transition(State::connecting())
            }
            // An address cannot arrive before an association attempt.
            LinkEvent::AddressAssigned { .. } => {
                context.status = ApplyStatus::Ignored;
                Handled
            }
        }
    }

    #[state]
    fn connecting(&mut self, context: &mut DispatchContext, event: &LinkEvent) -> Outcome<State> {
        match event {
            LinkEvent::LinkStarted => {
                context.status = ApplyStatus::Unchanged;
                context.action = Some(LinkAction::Connect);
                Handled
            }
            LinkEvent::LinkLost { .. } => {
                self.begin_reconnect(context);
                Handled
            }
            LinkEvent::AddressAssigned { address } => {
                self.snapshot.address = Some(*address);
                self.snapshot.state = ConnectivityState::Connected;
                context.status = ApplyStatus::Applied;
                Transition(State::connected())
            }
        }
    }

    #[state]
    fn connected(&mut self, context: &mut DispatchContext, event: &LinkEvent) -> Outcome<State> {
        match event {
            LinkEvent::LinkStarted => {
                context.status = ApplyStatus::Ignored;
                Handled
            }
            LinkEvent::LinkLost { .. } => {
                self.begin_reconnect(context);
                Transition(State::connecting())
            }
            LinkEvent::AddressAssigned { address } => {
                if self.snapshot.address == Some(*address) {
                    context.status = ApplyStatus::Unchanged;
                } else {
                    self.snapshot.address = Some(*address);
                    context.status = ApplyStatus::Applied;
                }
                Handled
            }
        }
    }
}
