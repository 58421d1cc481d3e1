//! The single-shot request task: wait for the link, send one request,
//! pull one field out of the answer, release the transport.

mod latch;
mod outcome;


use core::str;

use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{info, warn};

use crate::config::ProbeConfig;
use crate::connectivity::{ConnectivityStatus, Ipv4Octets};
use crate::extract::{extract_string_field, ExtractError};
use crate::request::RequestDescriptor;
use crate::response::{AllocError, BodyError, ResponseBody, ResponseEnvelope};

pub use latch::RequestLatch;
pub use outcome::RequestOutcome;

/// Transport-level failure with a stable, log-friendly name.
pub trait TransportFault {
    fn name(&self) -> &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeError<E> {
    /// Nothing usable came back; no body buffer was allocated.
    Transport(E),
    Allocation {
        envelope: ResponseEnvelope,
        error: AllocError,
    },
    Body {
        envelope: ResponseEnvelope,
        error: BodyError,
    },
}

/// One HTTP exchange. Implementations read the status line and headers, call
/// [`ResponseBody::allocate`] with the declared length, stream the body into
/// it and [`ResponseBody::finish`] it.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Fault: TransportFault;

    async fn exchange(
        &mut self,
        request: &RequestDescriptor<'_>,
        body: &mut ResponseBody,
    ) -> Result<ResponseEnvelope, ExchangeError<Self::Fault>>;

    /// Releases whatever the transport still holds once the exchange is over.
    /// Called exactly once, whatever the outcome.
    fn close(self);
}

pub struct RequestTask<'a> {
    request: RequestDescriptor<'a>,
    field_name: &'a str,
    body_budget: usize,
}

impl<'a> RequestTask<'a> {
    pub(crate) fn new(config: &ProbeConfig<'a>) -> Self {
        Self {
            request: RequestDescriptor::from_config(config),
            field_name: config.endpoint.field_name,
            body_budget: config.body_budget,
        }
    }

    pub fn request(&self) -> &RequestDescriptor<'a> {
        &self.request
    }

    pub async fn run<M, T>(self, status: &ConnectivityStatus<M>, mut transport: T) -> RequestOutcome<'a>
    where
        M: RawMutex,
        T: Transport,
    {
        let address = status.wait_connected().await;
        info!(
            "request: link ready ip={} POST {}",
            Ipv4Octets(address),
            self.request.url()
        );

        let outcome = self.perform(&mut transport).await;
        transport.close();
        outcome.log();
        outcome
    }

    async fn perform<T: Transport>(&self, transport: &mut T) -> RequestOutcome<'a> {
        let mut body = ResponseBody::new(self.body_budget);
        let envelope = match transport.exchange(&self.request, &mut body).await {
            Ok(envelope) => envelope,
            Err(ExchangeError::Transport(fault)) => {
                return RequestOutcome::Transport { name: fault.name() }
            }
            Err(ExchangeError::Allocation { envelope, error }) => {
                log_envelope(envelope);
                return RequestOutcome::Allocation(error);
            }
            Err(ExchangeError::Body { envelope, error }) => {
                log_envelope(envelope);
                return RequestOutcome::Body(error);
            }
        };
        log_envelope(envelope);
        log_body(body.body());

        match extract_string_field(body.body(), self.field_name) {
            Ok(value) => RequestOutcome::Extracted {
                name: self.field_name,
                value,
            },
            Err(ExtractError::Parse(error)) => RequestOutcome::Parse(error),
            Err(ExtractError::Missing) => RequestOutcome::Missing {
                name: self.field_name,
            },
            Err(ExtractError::TypeMismatch(kind)) => RequestOutcome::TypeMismatch {
                name: self.field_name,
                kind,
            },
            Err(ExtractError::OutOfMemory) => {
                RequestOutcome::Allocation(AllocError::OutOfMemory {
                    requested: body.body().len(),
                })
            }
        }
    }
}

fn log_envelope(envelope: ResponseEnvelope) {
    match envelope.content_length {
        Some(len) => info!(
            "HTTP POST status: {}, content length: {}",
            envelope.status, len
        ),
        None => info!(
            "HTTP POST status: {}, content length: unknown",
            envelope.status
        ),
    }
    if !envelope.is_success() {
        warn!("request: non-success status {}", envelope.status);
    }
}

fn log_body(body: &[u8]) {
    match str::from_utf8(body) {
        Ok(text) => info!("Response: {}", text),
        Err(_) => warn!("Response: {} bytes, not utf-8", body.len()),
    }
}
