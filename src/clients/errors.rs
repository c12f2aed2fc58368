//! Error types for rest.li calls.
//!
//! - [`TransportError`]: the request could not be sent or its body could not be read
//! - [`UnsupportedProtocolVersionError`]: the server did not answer with protocol 2.0.0
//! - [`UrlError`]: the request URL could not be built
//! - [`ClientError`]: unified error type returned by every client operation
//!
//! # Example
//!
//! ```rust,ignore
//! use restli_client::ClientError;
//!
//! match client.do_and_decode::<Widget>(request).await {
//!     Ok(response) => println!("Widget: {:?}", response.value),
//!     Err(ClientError::Application(e)) => println!("Server error {}: {:?}", e.status, e.message),
//!     Err(ClientError::MissingRequiredFields(e)) => println!("Incomplete widget: {e}"),
//!     Err(e) => println!("Call failed: {e}"),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::clients::restli_error::RestLiError;
use crate::codec::{DecodeError, EncodeError, MissingRequiredFieldsError};

/// A boxed error from a transport or resolver implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The transport step that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportOp {
    /// Sending the request and receiving the response head.
    Send,
    /// Reading the response body.
    Read,
    /// Closing the response body.
    Close,
}

impl fmt::Display for TransportOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => write!(f, "send"),
            Self::Read => write!(f, "read"),
            Self::Close => write!(f, "close"),
        }
    }
}

/// Error returned when the transport fails.
///
/// The transport's own error is kept unchanged as the source, so callers can
/// downcast it (e.g. to `reqwest::Error` to check for timeouts).
#[derive(Debug, Error)]
#[error("Transport {op} failed for {url}: {source}")]
pub struct TransportError {
    /// The step that failed.
    pub op: TransportOp,
    /// The request URL.
    pub url: String,
    /// The transport's error.
    #[source]
    pub source: BoxError,
}

impl TransportError {
    pub(crate) fn new(op: TransportOp, url: &str, source: BoxError) -> Self {
        Self {
            op,
            url: url.to_string(),
            source,
        }
    }
}

/// Error returned when a response does not declare protocol version 2.0.0.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported rest.li protocol version: {}", .version.as_deref().unwrap_or("<absent>"))]
pub struct UnsupportedProtocolVersionError {
    /// The version the server declared, or `None` if the header was absent.
    pub version: Option<String>,
}

/// Error returned when a request URL cannot be built.
#[derive(Debug, Error)]
pub enum UrlError {
    /// A resource key could not be encoded.
    #[error("Cannot encode resource path: {0}")]
    ResourcePath(#[source] EncodeError),

    /// A query parameter could not be encoded.
    #[error("Cannot encode query parameters: {0}")]
    Query(#[source] EncodeError),

    /// The hostname resolver failed.
    #[error("Cannot resolve host for root resource '{root_resource}': {source}")]
    Resolver {
        /// The resource being resolved.
        root_resource: String,
        /// The resolver's error.
        #[source]
        source: BoxError,
    },

    /// The assembled URL is not valid.
    #[error("Invalid request URL '{url}': {source}")]
    Parse {
        /// The text that failed to parse.
        url: String,
        /// The parser's error.
        #[source]
        source: url::ParseError,
    },
}

/// Unified error type for all rest.li client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network, read or close failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server does not speak protocol 2.0.0. The body was not decoded.
    #[error(transparent)]
    UnsupportedProtocolVersion(#[from] UnsupportedProtocolVersionError),

    /// The response body was malformed or did not match the expected type.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Strict mode only: the response lacked required fields.
    #[error(transparent)]
    MissingRequiredFields(#[from] MissingRequiredFieldsError),

    /// The server flagged the response as an error.
    #[error(transparent)]
    Application(#[from] RestLiError),

    /// The request payload could not be serialized.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The request URL could not be built.
    #[error(transparent)]
    Url(#[from] UrlError),
}

// Verify ClientError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_message_names_op_and_url() {
        let error = TransportError::new(
            TransportOp::Read,
            "https://api.example.com/widgets/1",
            "connection reset".into(),
        );
        assert_eq!(
            error.to_string(),
            "Transport read failed for https://api.example.com/widgets/1: connection reset"
        );
    }

    #[test]
    fn test_transport_error_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline");
        let error = TransportError::new(TransportOp::Send, "https://x", Box::new(io));

        let source = std::error::Error::source(&error).unwrap();
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_unsupported_version_message() {
        let error = UnsupportedProtocolVersionError {
            version: Some("1.0.0".to_string()),
        };
        assert!(error.to_string().contains("1.0.0"));

        let error = UnsupportedProtocolVersionError { version: None };
        assert!(error.to_string().contains("<absent>"));
    }

    #[test]
    fn test_client_error_from_conversions() {
        let error: ClientError = RestLiError {
            status: 404,
            ..RestLiError::default()
        }
        .into();
        assert!(matches!(error, ClientError::Application(ref e) if e.status == 404));

        let error: ClientError = EncodeError::EmptyRootResource.into();
        assert!(matches!(error, ClientError::Encode(_)));

        let error: ClientError = UrlError::Query(EncodeError::custom("bad")).into();
        assert!(error.to_string().contains("Cannot encode query parameters"));
    }
}
