//! The seam between the rest.li pipeline and the HTTP stack.
//!
//! A [`Transport`] sends a fully built `reqwest::Request` and hands back the
//! response head plus a [`ResponseBody`]. The pipeline reads every body to
//! the end and then closes it; [`ResponseBody::close`] takes the body by
//! value, so a body cannot be closed twice or used after closing.
//!
//! [`ReqwestTransport`] is the default implementation. Tests and alternative
//! stacks implement the traits directly.

use std::future::Future;

use bytes::{Bytes, BytesMut};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::clients::errors::BoxError;
use crate::error::ConfigError;

/// Sends requests.
///
/// Implementations must honor the request's timeout
/// (`reqwest::Request::timeout`), which carries the per-call deadline.
pub trait Transport: Send + Sync {
    /// The body type of the responses this transport returns.
    type Body: ResponseBody;

    /// Sends `request` and returns once the response head has arrived.
    ///
    /// # Errors
    ///
    /// Returns the transport's own error; the pipeline wraps it without
    /// changing it.
    fn send(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<TransportResponse<Self::Body>, BoxError>> + Send;
}

/// A response body that is read once and then closed.
pub trait ResponseBody: Send {
    /// Reads the remaining body.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the body cannot be read.
    fn read_to_end(&mut self) -> impl Future<Output = Result<Bytes, BoxError>> + Send;

    /// Releases the body and its connection.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the body cannot be released cleanly.
    fn close(self) -> Result<(), BoxError>;
}

/// A response head plus its unread body.
#[derive(Debug)]
pub struct TransportResponse<B> {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// The unread body.
    pub body: B,
}

/// The default transport, backed by a pooled `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Creates a transport with a new rustls-backed connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing client, sharing its connection pool.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    type Body = ReqwestBody;

    fn send(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<TransportResponse<Self::Body>, BoxError>> + Send {
        let client = self.client.clone();
        async move {
            let response = client.execute(request).await?;
            Ok(TransportResponse {
                status: response.status(),
                headers: response.headers().clone(),
                body: ReqwestBody { response },
            })
        }
    }
}

/// Body of a [`ReqwestTransport`] response.
#[derive(Debug)]
pub struct ReqwestBody {
    response: reqwest::Response,
}

impl ResponseBody for ReqwestBody {
    fn read_to_end(&mut self) -> impl Future<Output = Result<Bytes, BoxError>> + Send {
        async move {
            let mut data = BytesMut::new();
            while let Some(chunk) = self.response.chunk().await? {
                data.extend_from_slice(&chunk);
            }
            Ok(data.freeze())
        }
    }

    fn close(self) -> Result<(), BoxError> {
        // Dropping a fully read response returns its connection to the pool.
        drop(self.response);
        Ok(())
    }
}
