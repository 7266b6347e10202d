//! OJP client configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Largest page the paginated loader will request
pub const MAX_PAGE_SIZE: u32 = 20;

/// Configuration for an OJP endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct OjpConfig {
    /// URL requests are POSTed to
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Identity embedded as `siri:RequestorRef` in every request
    #[serde(default = "default_requestor_ref")]
    pub requestor_ref: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra headers sent with every request, passed through unmodified
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Language tag requested for texts
    #[serde(default = "default_language")]
    pub language: String,

    /// Trips per page for paginated trip searches
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_endpoint_url() -> String {
    "https://api.opentransportdata.swiss/ojp20".to_string()
}

fn default_requestor_ref() -> String {
    concat!("ojp-client_", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_language() -> String {
    "de".to_string()
}

const fn default_page_size() -> u32 {
    6
}

impl Default for OjpConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            requestor_ref: default_requestor_ref(),
            timeout_secs: default_timeout_secs(),
            headers: BTreeMap::new(),
            language: default_language(),
            page_size: default_page_size(),
        }
    }
}

impl std::fmt::Debug for OjpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .keys()
            .map(|name| (name.as_str(), "[REDACTED]"))
            .collect();
        f.debug_struct("OjpConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("requestor_ref", &self.requestor_ref)
            .field("timeout_secs", &self.timeout_secs)
            .field("headers", &headers)
            .field("language", &self.language)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl OjpConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            endpoint_url: "http://localhost:8080/ojp".to_string(),
            requestor_ref: "test".to_string(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Same configuration pointed at another endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    /// Add a header sent with every request
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint_url.is_empty() {
            return Err("endpoint_url must not be empty".to_string());
        }

        if !self.endpoint_url.starts_with("http://") && !self.endpoint_url.starts_with("https://")
        {
            return Err("endpoint_url must be an http(s) URL".to_string());
        }

        if self.requestor_ref.trim().is_empty() {
            return Err("requestor_ref must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.page_size == 0 {
            return Err("page_size must be greater than 0".to_string());
        }

        if self.page_size > MAX_PAGE_SIZE {
            return Err(format!("page_size must be {MAX_PAGE_SIZE} or less"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = OjpConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.page_size, 6);
        assert!(config.headers.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn testing_config() {
        let config = OjpConfig::for_testing();
        assert_eq!(config.requestor_ref, "test");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_endpoint() {
        let config = OjpConfig::default().with_endpoint("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let config = OjpConfig::default().with_endpoint("ftp://example.org");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_requestor() {
        let config = OjpConfig {
            requestor_ref: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = OjpConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_page_size_out_of_range() {
        for page_size in [0, MAX_PAGE_SIZE + 1] {
            let config = OjpConfig {
                page_size,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "page_size {page_size}");
        }
    }

    #[test]
    fn debug_redacts_header_values() {
        let config = OjpConfig::for_testing().with_header("Authorization", "Bearer secret-token");
        let shown = format!("{config:?}");
        assert!(shown.contains("Authorization"));
        assert!(!shown.contains("secret-token"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: OjpConfig =
            serde_json::from_str(r#"{"requestor_ref": "me", "headers": {"X-Api-Key": "k"}}"#)
                .unwrap();
        assert_eq!(config.requestor_ref, "me");
        assert_eq!(config.endpoint_url, default_endpoint_url());
        assert_eq!(config.headers.get("X-Api-Key").map(String::as_str), Some("k"));
    }
}
