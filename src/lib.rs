//! # rest.li client runtime
//!
//! A Rust client runtime for the rest.li HTTP/JSON protocol (protocol
//! version 2.0.0). Generated per-resource clients use it to build canonical
//! resource URLs, negotiate protocol headers, serialize payloads with field
//! projection and classify responses.
//!
//! ## Overview
//!
//! This crate provides:
//! - A streaming codec ([`codec`]) with field projection for JSON bodies and
//!   the ROR2 URI form used in keys and query parameters
//! - Resource paths, query strings and hostname resolution ([`protocol`])
//! - Request constructors and a response pipeline ([`RestLiClient`]) that
//!   enforces the protocol version, surfaces server-flagged errors and
//!   always drains and closes response bodies
//! - Type-safe configuration via [`ClientConfig`] and validated [`HostUrl`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use restli_client::{ClientConfig, EntityPath, HostUrl, Query, RequestContext, RestLiClient, RestLiMethod};
//!
//! let client = RestLiClient::builder()
//!     .host(HostUrl::new("https://api.example.com/gateway").unwrap())
//!     .config(ClientConfig::builder().user_agent_prefix("WidgetApp/1.0").build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let path = EntityPath::new("widgets").unwrap().key(&42_i64).unwrap();
//! let request = client
//!     .new_get_request(&RequestContext::new(), &path, Query::None, RestLiMethod::Get)
//!     .unwrap();
//!
//! assert_eq!(request.url().as_str(), "https://api.example.com/gateway/widgets/42");
//! ```
//!
//! ## Typed Payloads
//!
//! Record types implement [`Marshaler`](codec::Marshaler) and
//! [`Unmarshaler`](codec::Unmarshaler):
//!
//! ```rust,ignore
//! use restli_client::codec::{DecodeError, EncodeError, Marshaler, Reader, Unmarshaler, Writer};
//!
//! #[derive(Default)]
//! struct Widget {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Marshaler for Widget {
//!     fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
//!         writer.write_map(|fields| {
//!             fields.entry("id", |w| w.write_i64(self.id))?;
//!             fields.entry("name", |w| w.write_string(&self.name))
//!         })
//!     }
//! }
//!
//! impl Unmarshaler for Widget {
//!     fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
//!         let mut widget = Self::default();
//!         reader.read_record(&["id", "name"], |reader, field| {
//!             match field {
//!                 "id" => widget.id = reader.read_i64()?,
//!                 "name" => widget.name = reader.read_string()?,
//!                 _ => reader.skip()?,
//!             }
//!             Ok(())
//!         })?;
//!         Ok(widget)
//!     }
//! }
//!
//! let response = client.do_and_decode::<Widget>(request).await?;
//! println!("{} ({})", response.value.name, response.status);
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`ClientError`] on failure. Missing required fields in
//! a response are tolerated unless
//! [`ClientConfig::strict_response_deserialization`] is set. Configuration
//! errors are reported as [`ConfigError`] when the client is built.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` for dispatched requests and
//! tolerated missing fields, `warn` for protocol version mismatches and
//! application errors). No subscriber is installed.
//!
//! ## Thread Safety
//!
//! [`RestLiClient`] is `Send + Sync` and holds no per-call state; share one
//! client (e.g. in an `Arc`) across tasks.

pub mod clients;
pub mod codec;
pub mod config;
pub mod error;
pub mod protocol;

// Re-export public types at crate root for convenience
pub use config::{ClientConfig, ClientConfigBuilder, HostUrl};
pub use error::ConfigError;

pub use clients::{
    BoxError, ClientError, ReqwestTransport, RequestContext, ResponseBody, RestLiClient,
    RestLiClientBuilder, RestLiError, RestLiResponse, Transport, TransportError, TransportOp,
    TransportResponse, UnsupportedProtocolVersionError, UrlError, SDK_VERSION,
};

pub use protocol::{
    BatchEntityUpdateResponse, BatchResponse, CollectionMetadata, CollectionResponse,
    CreatedEntity, EmptyRecord, EntityPath, FinderResults, HostnameResolver, Query, QueryParams,
    QueryParamsEncoder, ResourcePath, RestLiMethod, SimpleHostnameResolver,
    StaticHostnameResolver,
};
