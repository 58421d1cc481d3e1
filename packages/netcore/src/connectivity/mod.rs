//! Connectivity monitor: link lifecycle, readiness status and reconnect spacing.
//!
//! The firmware driver owns the radio; it feeds [`LinkEvent`]s into a
//! [`ConnectivityEngine`] and performs whatever [`LinkAction`] comes back.
//! Everyone else observes the link through [`ConnectivityStatus`].

mod engine;
mod machine;
mod policy;
mod state;
mod status;


pub use engine::{ApplyResult, ApplyStatus, ConnectivityEngine};
pub use policy::{ReconnectPolicy, RECONNECT_DELAY_MAX_MS};
pub use state::{ConnectivityState, Ipv4Octets, LinkAction, LinkEvent, LinkSnapshot};
pub use status::ConnectivityStatus;
