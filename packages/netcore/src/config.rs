use core::fmt;

use heapless::String;
use log::warn;

use crate::connectivity::ReconnectPolicy;
use crate::{WIFI_PASSWORD_MAX, WIFI_SSID_MAX};

pub const DEFAULT_REQUEST_BODY: &str = r#"{"exampleKey":"exampleValue"}"#;
pub const DEFAULT_FIELD_NAME: &str = "binaryURL";

pub const REQUEST_TIMEOUT_DEFAULT_MS: u32 = 30_000;
pub const REQUEST_TIMEOUT_MIN_MS: u32 = 1_000;
pub const REQUEST_TIMEOUT_MAX_MS: u32 = 120_000;

pub const BODY_BUDGET_DEFAULT: usize = 4 * 1024;
pub const BODY_BUDGET_MIN: usize = 64;
pub const BODY_BUDGET_MAX: usize = 64 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    SsidEmpty,
    SsidTooLong,
    PasswordTooLong,
    UrlInvalid,
    FieldNameEmpty,
}

impl ConfigError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SsidEmpty => "ssid_empty",
            Self::SsidTooLong => "ssid_too_long",
            Self::PasswordTooLong => "password_too_long",
            Self::UrlInvalid => "url_invalid",
            Self::FieldNameEmpty => "field_name_empty",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Station credentials, fixed for the lifetime of the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkCredentials {
    ssid: String<WIFI_SSID_MAX>,
    password: String<WIFI_PASSWORD_MAX>,
}

impl NetworkCredentials {
    pub fn from_parts(ssid: &str, password: &str) -> Result<Self, ConfigError> {
        if ssid.is_empty() {
            return Err(ConfigError::SsidEmpty);
        }
        let mut result = Self {
            ssid: String::new(),
            password: String::new(),
        };
        result
            .ssid
            .push_str(ssid)
            .map_err(|_| ConfigError::SsidTooLong)?;
        result
            .password
            .push_str(password)
            .map_err(|_| ConfigError::PasswordTooLong)?;
        Ok(result)
    }

    pub fn ssid(&self) -> &str {
        self.ssid.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointConfig<'a> {
    pub url: &'a str,
    pub body: &'a str,
    pub field_name: &'a str,
}

impl<'a> EndpointConfig<'a> {
    pub fn new(url: &'a str, body: &'a str, field_name: &'a str) -> Result<Self, ConfigError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::UrlInvalid);
        }
        if field_name.is_empty() {
            return Err(ConfigError::FieldNameEmpty);
        }
        Ok(Self {
            url,
            body,
            field_name,
        })
    }

    pub fn is_tls(&self) -> bool {
        self.url.starts_with("https://")
    }
}

/// Everything both components need, assembled once at boot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig<'a> {
    pub credentials: NetworkCredentials,
    pub endpoint: EndpointConfig<'a>,
    pub reconnect: ReconnectPolicy,
    pub request_timeout_ms: u32,
    pub body_budget: usize,
}

impl<'a> ProbeConfig<'a> {
    pub fn new(credentials: NetworkCredentials, endpoint: EndpointConfig<'a>) -> Self {
        Self {
            credentials,
            endpoint,
            reconnect: ReconnectPolicy::Immediate,
            request_timeout_ms: REQUEST_TIMEOUT_DEFAULT_MS,
            body_budget: BODY_BUDGET_DEFAULT,
        }
    }

    pub fn sanitized(self) -> Self {
        Self {
            request_timeout_ms: clamp_u32(
                self.request_timeout_ms,
                REQUEST_TIMEOUT_MIN_MS,
                REQUEST_TIMEOUT_MAX_MS,
            ),
            body_budget: clamp_usize(self.body_budget, BODY_BUDGET_MIN, BODY_BUDGET_MAX),
            reconnect: self.reconnect.sanitized(),
            ..self
        }
    }
}

pub(crate) const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Parses a numeric build-time value. Unparsable values are logged and
/// treated as unset.
pub fn parse_build_u32(name: &str, raw: Option<&str>) -> Option<u32> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("config: {}={} is not a number; using default", name, raw);
            None
        }
    }
}

const fn clamp_usize(value: usize, min: usize, max: usize) -> usize {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> EndpointConfig<'static> {
        EndpointConfig::new(
            "https://fw.example.com/check",
            DEFAULT_REQUEST_BODY,
            DEFAULT_FIELD_NAME,
        )
        .unwrap()
    }

    #[test]
    fn build_values_parse_or_fall_back() {
        assert_eq!(parse_build_u32("T", Some("1500")), Some(1500));
        assert_eq!(parse_build_u32("T", Some(" 42 ")), Some(42));
        assert_eq!(parse_build_u32("T", Some("fast")), None);
        assert_eq!(parse_build_u32("T", Some("-1")), None);
        assert_eq!(parse_build_u32("T", None), None);
    }

    #[test]
    fn credentials_reject_empty_ssid() {
        assert_eq!(
            NetworkCredentials::from_parts("", "secret"),
            Err(ConfigError::SsidEmpty)
        );
    }

    #[test]
    fn credentials_enforce_length_limits() {
        let ssid = "s".repeat(WIFI_SSID_MAX);
        let password = "p".repeat(WIFI_PASSWORD_MAX);
        let credentials = NetworkCredentials::from_parts(&ssid, &password).unwrap();
        assert_eq!(credentials.ssid().len(), WIFI_SSID_MAX);
        assert!(!credentials.is_open());

        let long_ssid = "s".repeat(WIFI_SSID_MAX + 1);
        assert_eq!(
            NetworkCredentials::from_parts(&long_ssid, ""),
            Err(ConfigError::SsidTooLong)
        );
        let long_password = "p".repeat(WIFI_PASSWORD_MAX + 1);
        assert_eq!(
            NetworkCredentials::from_parts("lab", &long_password),
            Err(ConfigError::PasswordTooLong)
        );
    }

    #[test]
    fn empty_password_means_open_network() {
        let credentials = NetworkCredentials::from_parts("lab", "").unwrap();
        assert!(credentials.is_open());
    }

    #[test]
    fn endpoint_requires_http_scheme_and_field() {
        assert_eq!(
            EndpointConfig::new("fw.example.com", "{}", "binaryURL"),
            Err(ConfigError::UrlInvalid)
        );
        assert_eq!(
            EndpointConfig::new("http://fw.example.com", "{}", ""),
            Err(ConfigError::FieldNameEmpty)
        );
        assert!(endpoint().is_tls());
        assert!(!EndpointConfig::new("http://10.0.0.2/x", "{}", "a")
            .unwrap()
            .is_tls());
    }

    #[test]
    fn sanitized_clamps_timeout_and_budget() {
        let credentials = NetworkCredentials::from_parts("lab", "pw").unwrap();
        let mut config = ProbeConfig::new(credentials, endpoint());
        config.request_timeout_ms = 0;
        config.body_budget = usize::MAX;
        config.reconnect = ReconnectPolicy::Fixed { delay_ms: u32::MAX };

        let config = config.sanitized();
        assert_eq!(config.request_timeout_ms, REQUEST_TIMEOUT_MIN_MS);
        assert_eq!(config.body_budget, BODY_BUDGET_MAX);
        assert_eq!(
            config.reconnect,
            ReconnectPolicy::Fixed {
                delay_ms: crate::connectivity::RECONNECT_DELAY_MAX_MS
            }
        );
    }

    #[test]
    fn defaults_are_already_sane() {
        let credentials = NetworkCredentials::from_parts("lab", "pw").unwrap();
        let config = ProbeConfig::new(credentials, endpoint());
        assert_eq!(config.clone().sanitized(), config);
        assert_eq!(config.reconnect, ReconnectPolicy::Immediate);
    }
}
