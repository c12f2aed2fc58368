//! Validated newtype wrappers for configuration values.
//!
//! Values are validated on construction; invalid values are rejected with a
//! [`ConfigError`] instead of surfacing later as request failures.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// A validated base URL for a rest.li service.
///
/// The URL must be absolute, use the `http` or `https` scheme and name a host.
/// Its path is the context path the service is mounted under; query and
/// fragment are discarded since resource URLs carry their own.
///
/// # Example
///
/// ```rust
/// use restli_client::HostUrl;
///
/// let url = HostUrl::new("https://api.example.com/gateway").unwrap();
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), Some("api.example.com"));
/// assert_eq!(url.context_path(), "/gateway");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostUrl(Url);

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let trimmed = raw.trim();
        let invalid = || ConfigError::InvalidHostUrl {
            url: trimmed.to_string(),
        };

        let mut parsed = Url::parse(trimmed).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid());
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid());
        }

        parsed.set_query(None);
        parsed.set_fragment(None);
        Ok(Self(parsed))
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns the path the service is mounted under (`/` if none).
    #[must_use]
    pub fn context_path(&self) -> &str {
        self.0.path()
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for HostUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Serialize for HostUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for HostUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_url_validates_format() {
        let url = HostUrl::new("https://api.example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), Some("api.example.com"));
        assert_eq!(url.context_path(), "/");

        // With port
        let url = HostUrl::new("http://localhost:3000").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_name(), Some("localhost"));

        // With context path
        let url = HostUrl::new("  https://api.example.com/gateway/widgets  ").unwrap();
        assert_eq!(url.context_path(), "/gateway/widgets");
    }

    #[test]
    fn test_host_url_drops_query_and_fragment() {
        let url = HostUrl::new("https://api.example.com/ctx?debug=1#top").unwrap();
        assert_eq!(url.as_ref(), "https://api.example.com/ctx");
    }

    #[test]
    fn test_host_url_rejects_invalid() {
        // No scheme
        assert!(HostUrl::new("api.example.com").is_err());

        // Empty host
        assert!(HostUrl::new("https://").is_err());

        // Unsupported scheme
        assert!(matches!(
            HostUrl::new("ftp://files.example.com"),
            Err(ConfigError::InvalidHostUrl { url }) if url == "ftp://files.example.com"
        ));

        // Not a hierarchical URL
        assert!(HostUrl::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_host_url_serde_round_trip() {
        let url = HostUrl::new("https://api.example.com/gateway").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, r#""https://api.example.com/gateway""#);

        let parsed: HostUrl = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, url);

        let invalid: Result<HostUrl, _> = serde_json::from_str(r#""nope""#);
        assert!(invalid.is_err());
    }
}
