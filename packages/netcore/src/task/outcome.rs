use core::fmt;

use log::{error, info};
use serde_json_core::de::Error as JsonError;

use crate::extract::{ExtractedField, FieldKind};
use crate::response::{AllocError, BodyError};

/// Terminal result of a request task. Every variant other than `Extracted`
/// ends the task without a retry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestOutcome<'a> {
    Extracted {
        name: &'a str,
        value: ExtractedField,
    },
    Transport {
        name: &'static str,
    },
    Allocation(AllocError),
    Body(BodyError),
    Parse(JsonError),
    Missing {
        name: &'a str,
    },
    TypeMismatch {
        name: &'a str,
        kind: FieldKind,
    },
}

impl RequestOutcome<'_> {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted { .. } => "extracted",
            Self::Transport { .. } => "transport",
            Self::Allocation(_) => "allocation",
            Self::Body(_) => "body",
            Self::Parse(_) => "parse",
            Self::Missing { .. } => "missing",
            Self::TypeMismatch { .. } => "type_mismatch",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Extracted { value, .. } => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn log(&self) {
        if self.is_success() {
            info!("{}", self);
        } else {
            error!("{}", self);
        }
    }
}

impl fmt::Display for RequestOutcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extracted { name, value } => write!(f, "{}: {}", name, value),
            Self::Transport { name } => write!(f, "HTTP POST request failed: {}", name),
            Self::Allocation(err) => write!(f, "Failed to allocate response buffer: {}", err),
            Self::Body(err) => write!(f, "Failed to read response body: {}", err),
            Self::Parse(err) => write!(f, "Failed to parse JSON response: {}", err),
            Self::Missing { name } => write!(f, "{} not found in response.", name),
            Self::TypeMismatch { name, kind } => {
                write!(f, "{} is not a string (got {})", name, kind.as_str())
            }
        }
    }
}
