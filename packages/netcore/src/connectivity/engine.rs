use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{info, warn};
use statig::blocking::IntoStateMachineExt as _;

use super::machine::{ConnectivityMachine, DispatchContext};
use super::state::{Ipv4Octets, LinkAction, LinkEvent, LinkSnapshot};
use super::status::ConnectivityStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyStatus {
    Applied,
    Unchanged,
    Ignored,
}

impl ApplyStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::Ignored => "ignored",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ApplyResult {
    pub before: LinkSnapshot,
    pub after: LinkSnapshot,
    pub action: Option<LinkAction>,
    pub status: ApplyStatus,
}

impl ApplyResult {
    pub fn changed(self) -> bool {
        matches!(self.status, ApplyStatus::Applied)
    }

    pub fn became_ready(self) -> bool {
        self.after.state.is_connected() && !self.before.state.is_connected()
    }
}

/// Single writer of a [`ConnectivityStatus`]. Owned by the connectivity driver.
pub struct ConnectivityEngine<'a, M: RawMutex> {
    machine: statig::blocking::StateMachine<ConnectivityMachine>,
    status: &'a ConnectivityStatus<M>,
}

impl<'a, M: RawMutex> ConnectivityEngine<'a, M> {
    pub fn new(status: &'a ConnectivityStatus<M>) -> Self {
        let engine = Self {
            machine: ConnectivityMachine::new().state_machine(),
            status,
        };
        engine.status.publish(engine.snapshot());
        engine
    }

    pub fn snapshot(&self) -> LinkSnapshot {
        self.machine.inner().snapshot
    }

    /// Interface bring-up succeeded; returns the first action for the driver.
    pub fn start(&mut self) -> Option<LinkAction> {
        self.apply(LinkEvent::LinkStarted).action
    }

    pub fn apply(&mut self, event: LinkEvent) -> ApplyResult {
        let before = self.snapshot();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        let after = self.snapshot();
        let result = ApplyResult {
            before,
            after,
            action: context.action,
            status: context.status,
        };
        self.status.publish(after);
        log_transition(event, result);
        result
    }
}

fn log_transition(event: LinkEvent, result: ApplyResult) {
    match event {
        LinkEvent::LinkLost { reason } => {
            warn!(
                "wifi: link lost reason={} reconnect_attempt={}",
                reason, result.after.reconnect_attempts
            );
        }
        LinkEvent::AddressAssigned { address } if result.changed() => {
            info!("wifi: address assigned ip={}", Ipv4Octets(address));
        }
        _ => {}
    }

    if matches!(result.status, ApplyStatus::Ignored) {
        warn!(
            "wifi: event {} ignored in state {}",
            event.as_str(),
            result.before.state.as_str()
        );
        return;
    }

    if result.before.state != result.after.state {
        info!(
            "NET_EVENT {{\"from\":\"{}\",\"to\":\"{}\",\"trigger\":\"{}\"}}",
            result.before.state.as_str(),
            result.after.state.as_str(),
            event.as_str()
        );
    }
}
