//! Client configuration.
//!
//! The base URL comes from `TRIPS_API_URL` and falls back to the local
//! development backend.

use std::env;

use crate::error::ConfigError;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "TRIPS_API_URL";

/// Backend address used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    /// Validate `base_url` and drop any trailing slash.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = url::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        if parsed.query().is_some() {
            return Err(invalid("query strings are not allowed".to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Read `TRIPS_API_URL`. Unset or blank falls back to the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(env::var(BASE_URL_ENV).ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Result<Self, ConfigError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(url) => Self::new(url),
            None => Ok(Self::default()),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://api.example.com/v1/").unwrap();
        assert_eq!(config.base_url, "http://api.example.com/v1");
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = ClientConfig::new("ftp://example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn query_string_is_rejected() {
        assert!(ClientConfig::new("http://localhost:8000/?x=1").is_err());
    }

    #[test]
    fn unset_env_value_uses_default() {
        assert_eq!(ClientConfig::from_value(None).unwrap(), ClientConfig::default());
    }

    #[test]
    fn blank_env_value_uses_default() {
        assert_eq!(ClientConfig::from_value(Some("")).unwrap(), ClientConfig::default());
        assert_eq!(ClientConfig::from_value(Some("   ")).unwrap(), ClientConfig::default());
    }

    #[test]
    fn padded_env_value_is_trimmed() {
        let config = ClientConfig::from_value(Some("  http://staging:8000/ \n")).unwrap();
        assert_eq!(config.base_url, "http://staging:8000");
    }

    #[test]
    fn invalid_env_value_is_an_error() {
        assert!(ClientConfig::from_value(Some("staging")).is_err());
    }

    #[test]
    fn default_points_at_local_backend() {
        assert_eq!(ClientConfig::default().base_url, "http://localhost:8000");
    }
}
