use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use super::state::{ConnectivityState, LinkSnapshot};

/// Published view of the link, written only by [`super::ConnectivityEngine`].
///
/// Readers take atomic snapshots or park on [`Self::wait_connected`].
pub struct ConnectivityStatus<M: RawMutex> {
    state: AtomicU8,
    address: AtomicU32,
    has_address: AtomicBool,
    reconnect_attempts: AtomicU32,
    ready: Signal<M, [u8; 4]>,
}

impl<M: RawMutex> ConnectivityStatus<M> {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectivityState::Disconnected as u8),
            address: AtomicU32::new(0),
            has_address: AtomicBool::new(false),
            reconnect_attempts: AtomicU32::new(0),
            ready: Signal::new(),
        }
    }

    pub fn state(&self) -> ConnectivityState {
        ConnectivityState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn address(&self) -> Option<[u8; 4]> {
        self.has_address
            .load(Ordering::Relaxed)
            .then(|| self.address.load(Ordering::Relaxed).to_be_bytes())
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts.load(Ordering::Relaxed)
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Resolves once the link is `Connected`, with the assigned address.
    pub async fn wait_connected(&self) -> [u8; 4] {
        loop {
            if self.is_connected() {
                if let Some(address) = self.address() {
                    return address;
                }
            }
            // Stale signals from an earlier connection are re-checked above.
            self.ready.wait().await;
        }
    }

    pub(super) fn publish(&self, snapshot: LinkSnapshot) {
        if let Some(address) = snapshot.address {
            self.address.store(u32::from_be_bytes(address), Ordering::Relaxed);
        }
        self.has_address
            .store(snapshot.address.is_some(), Ordering::Relaxed);
        self.reconnect_attempts
            .store(snapshot.reconnect_attempts, Ordering::Relaxed);
        self.state.store(snapshot.state as u8, Ordering::Release);
        if let (ConnectivityState::Connected, Some(address)) = (snapshot.state, snapshot.address) {
            self.ready.signal(address);
        }
    }
}

impl<M: RawMutex> Default for ConnectivityStatus<M> {
    fn default() -> Self {
        Self::new()
    }
}
