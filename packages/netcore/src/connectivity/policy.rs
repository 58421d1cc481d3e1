use crate::config::{clamp_u32, parse_build_u32};

pub const RECONNECT_DELAY_MAX_MS: u32 = 60_000;

/// Spacing between reconnect attempts. Never bounds how many attempts are made.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReconnectPolicy {
    #[default]
    Immediate,
    Fixed {
        delay_ms: u32,
    },
    Exponential {
        base_ms: u32,
        max_ms: u32,
    },
}

impl ReconnectPolicy {
    /// Delay before the given 1-based reconnect attempt.
    pub const fn delay_ms(self, attempt: u32) -> u32 {
        match self {
            Self::Immediate => 0,
            Self::Fixed { delay_ms } => delay_ms,
            Self::Exponential { base_ms, max_ms } => {
                let shift = if attempt == 0 { 0 } else { attempt - 1 };
                let factor = match 1u32.checked_shl(shift) {
                    Some(factor) => factor,
                    None => u32::MAX,
                };
                let delay = base_ms.saturating_mul(factor);
                if delay > max_ms {
                    max_ms
                } else {
                    delay
                }
            }
        }
    }

    /// Selects a policy from the raw build-time delay and cap: a delay alone
    /// is `Fixed`, a delay with a cap is `Exponential`. A missing or
    /// unparsable delay keeps the default.
    pub fn from_build_values(delay_ms: Option<&str>, max_ms: Option<&str>) -> Self {
        let delay_ms = parse_build_u32("FWLOCATE_RECONNECT_DELAY_MS", delay_ms);
        let max_ms = parse_build_u32("FWLOCATE_RECONNECT_MAX_MS", max_ms);
        match (delay_ms, max_ms) {
            (Some(base_ms), Some(max_ms)) => Self::Exponential { base_ms, max_ms },
            (Some(delay_ms), None) => Self::Fixed { delay_ms },
            (None, _) => Self::default(),
        }
    }

    pub const fn sanitized(self) -> Self {
        match self {
            Self::Immediate => Self::Immediate,
            Self::Fixed { delay_ms } => Self::Fixed {
                delay_ms: clamp_u32(delay_ms, 0, RECONNECT_DELAY_MAX_MS),
            },
            Self::Exponential { base_ms, max_ms } => {
                let max_ms = clamp_u32(max_ms, 0, RECONNECT_DELAY_MAX_MS);
                Self::Exponential {
                    base_ms: clamp_u32(base_ms, 0, max_ms),
                    max_ms,
                }
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Fixed { .. } => "fixed",
            Self::Exponential { .. } => "exponential",
        }
    }
}
