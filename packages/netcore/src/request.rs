use crate::config::ProbeConfig;

pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Post,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
        }
    }
}

/// The single request a task sends. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestDescriptor<'a> {
    url: &'a str,
    method: Method,
    extra_headers: &'a [(&'a str, &'a str)],
    body: &'a [u8],
}

impl<'a> RequestDescriptor<'a> {
    pub const fn post_json(
        url: &'a str,
        body: &'a [u8],
        extra_headers: &'a [(&'a str, &'a str)],
    ) -> Self {
        Self {
            url,
            method: Method::Post,
            extra_headers,
            body,
        }
    }

    pub fn from_config(config: &ProbeConfig<'a>) -> Self {
        Self::post_json(config.endpoint.url, config.endpoint.body.as_bytes(), &[])
    }

    pub fn url(&self) -> &'a str {
        self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE_JSON
    }

    /// Headers beyond `Content-Type`, which the transport sets itself.
    pub fn extra_headers(&self) -> &'a [(&'a str, &'a str)] {
        self.extra_headers
    }

    pub fn header(&self, name: &str) -> Option<&'a str> {
        if name.eq_ignore_ascii_case("content-type") {
            return Some(CONTENT_TYPE_JSON);
        }
        self.extra_headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointConfig, NetworkCredentials, DEFAULT_REQUEST_BODY};

    #[test]
    fn from_config_posts_json_body() {
        let credentials = NetworkCredentials::from_parts("lab", "pw").unwrap();
        let endpoint =
            EndpointConfig::new("https://fw.example.com/check", DEFAULT_REQUEST_BODY, "binaryURL")
                .unwrap();
        let config = ProbeConfig::new(credentials, endpoint);

        let request = RequestDescriptor::from_config(&config);
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.method().as_str(), "POST");
        assert_eq!(request.url(), "https://fw.example.com/check");
        assert_eq!(request.body(), br#"{"exampleKey":"exampleValue"}"#);
        assert_eq!(request.content_type(), "application/json");
        assert!(request.extra_headers().is_empty());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        const HEADERS: &[(&str, &str)] = &[("X-Device", "esp32"), ("Accept", "application/json")];
        let request = RequestDescriptor::post_json("http://10.0.0.2/fw", b"{}", HEADERS);

        assert_eq!(request.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(request.header("x-device"), Some("esp32"));
        assert_eq!(request.header("authorization"), None);
    }
}
