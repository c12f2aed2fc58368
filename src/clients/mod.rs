//! The rest.li client and its request/response pipeline.
//!
//! # Overview
//!
//! - [`RestLiClient`]: builds requests and runs the response pipeline
//! - [`RestLiClientBuilder`]: assembles transport, resolver and configuration
//! - [`RequestContext`]: per-call settings (timeout)
//! - [`RestLiResponse`]: a decoded value plus the response head
//! - [`Transport`] / [`ResponseBody`]: the seam to the HTTP stack, with
//!   [`ReqwestTransport`] as the default
//! - [`RestLiError`]: a server-signaled application error
//! - [`ClientError`]: the unified error type
//!
//! # Example
//!
//! ```rust,ignore
//! use restli_client::{EntityPath, HostUrl, Query, RequestContext, RestLiClient, RestLiMethod};
//!
//! let client = RestLiClient::builder()
//!     .host(HostUrl::new("https://api.example.com")?)
//!     .build()?;
//!
//! let path = EntityPath::new("widgets")?.key(&42_i64)?;
//! let request = client.new_get_request(&RequestContext::new(), &path, Query::None, RestLiMethod::Get)?;
//! let widget = client.do_and_decode::<Widget>(request).await?.value;
//! ```
//!
//! # Body Lifecycle
//!
//! Every response body the pipeline receives is read to the end and closed
//! exactly once, on success and on every failure path, so connections are
//! reused. A response whose protocol version is not `2.0.0` is drained
//! without being decoded.

mod client;
mod errors;
mod request;
mod response;
mod restli_error;
mod transport;

pub use client::{RestLiClient, RestLiClientBuilder, SDK_VERSION};
pub use errors::{
    BoxError, ClientError, TransportError, TransportOp, UnsupportedProtocolVersionError, UrlError,
};
pub use request::RequestContext;
pub use response::RestLiResponse;
pub use restli_error::RestLiError;
pub use transport::{ReqwestBody, ReqwestTransport, ResponseBody, Transport, TransportResponse};
