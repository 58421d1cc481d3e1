#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod connectivity;
pub mod extract;
pub mod request;
pub mod response;
pub mod task;

pub use config::{ConfigError, EndpointConfig, NetworkCredentials, ProbeConfig};
pub use connectivity::{
    ApplyResult, ApplyStatus, ConnectivityEngine, ConnectivityState, ConnectivityStatus,
    LinkAction, LinkEvent, ReconnectPolicy,
};
pub use extract::{extract_string_field, ExtractError, ExtractedField, FieldKind};
pub use request::{Method, RequestDescriptor};
pub use response::{AllocError, BodyError, ResponseBody, ResponseEnvelope};
pub use task::{
    ExchangeError, RequestLatch, RequestOutcome, RequestTask, Transport, TransportFault,
};

pub const WIFI_SSID_MAX: usize = 32;
pub const WIFI_PASSWORD_MAX: usize = 64;
