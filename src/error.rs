//! Configuration errors for the rest.li client.
//!
//! Every configuration constructor returns `Result<T, ConfigError>` so that an
//! invalid setup fails when the client is built, not on the first request.
//!
//! # Example
//!
//! ```rust
//! use restli_client::{ConfigError, HostUrl};
//!
//! let result = HostUrl::new("ftp://files.example.com");
//! assert!(matches!(result, Err(ConfigError::InvalidHostUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the client.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide an absolute http or https URL (e.g., 'https://api.example.com/gateway').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The default request timeout is zero.
    #[error("Request timeout must be greater than zero.")]
    ZeroTimeout,

    /// The user agent prefix cannot be sent as a header value.
    #[error("Invalid user agent prefix '{prefix}'. The prefix must be visible ASCII.")]
    InvalidUserAgentPrefix {
        /// The rejected prefix.
        prefix: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to create HTTP client: {message}")]
    HttpClient {
        /// Description from the HTTP library.
        message: String,
    },
}
