//! Configuration types for the rest.li client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: behavior settings shared by every call of a client
//! - [`ClientConfigBuilder`]: a builder for constructing [`ClientConfig`] instances
//! - [`HostUrl`]: a validated service base URL
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use restli_client::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .strict_response_deserialization(true)
//!     .timeout(Duration::from_secs(10))
//!     .user_agent_prefix("WidgetService/2.1")
//!     .build()
//!     .unwrap();
//!
//! assert!(config.strict_response_deserialization());
//! ```

mod newtypes;

pub use newtypes::HostUrl;

use std::time::Duration;

use crate::error::ConfigError;

/// Behavior settings for a [`RestLiClient`](crate::RestLiClient).
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    strict_response_deserialization: bool,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns whether missing required response fields fail the call.
    ///
    /// When `false` (the default), a response lacking required fields is
    /// still returned as a success with the partially populated value.
    #[must_use]
    pub const fn strict_response_deserialization(&self) -> bool {
        self.strict_response_deserialization
    }

    /// Returns the default per-request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `strict_response_deserialization`: `false`
/// - `timeout`: `None` (the transport's own default applies)
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    strict_response_deserialization: Option<bool>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether missing required response fields fail the call.
    #[must_use]
    pub const fn strict_response_deserialization(mut self, strict: bool) -> Self {
        self.strict_response_deserialization = Some(strict);
        self
    }

    /// Sets the default timeout applied to requests that carry none.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`], validating the supplied values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] for a zero timeout, and
    /// [`ConfigError::InvalidUserAgentPrefix`] if the prefix contains
    /// characters that are not allowed in a header value.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        if self.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeout);
        }
        if let Some(prefix) = &self.user_agent_prefix {
            if prefix.is_empty() || !prefix.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
                return Err(ConfigError::InvalidUserAgentPrefix {
                    prefix: prefix.clone(),
                });
            }
        }

        Ok(ClientConfig {
            strict_response_deserialization: self.strict_response_deserialization.unwrap_or(false),
            timeout: self.timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
