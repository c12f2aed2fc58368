//! Rest.li protocol vocabulary: headers, operation kinds, resource paths,
//! query strings, host resolution and the standard payload types.
//!
//! # Overview
//!
//! - [`RestLiMethod`]: the 13 operation kinds and their HTTP verbs
//! - [`ResourcePath`] / [`EntityPath`]: resource identity and canonical path
//! - [`QueryParamsEncoder`] / [`QueryParams`]: canonical query strings
//! - [`HostnameResolver`]: maps a root resource to the base URL serving it
//! - [`EmptyRecord`], [`CreatedEntity`], [`CollectionResponse`],
//!   [`BatchResponse`], [`BatchEntityUpdateResponse`]: standard payloads

mod method;
mod query;
mod resolver;
mod resource_path;
mod stdtypes;

pub use method::{RestLiMethod, UnknownRestLiMethodError};
pub use query::{Query, QueryParams, QueryParamsEncoder};
pub use resolver::{
    HostnameResolver, SimpleHostnameResolver, StaticHostnameResolver, UnknownResourceError,
};
pub use resource_path::{EntityPath, ResourcePath};
pub(crate) use resource_path::check_path;
pub use stdtypes::{
    BatchEntityUpdateResponse, BatchResponse, CollectionMetadata, CollectionResponse,
    CreatedEntity, EmptyRecord, FinderResults,
};

/// The only protocol version this client speaks.
pub const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";

// Header names are case-insensitive; the lowercase forms can be inserted
// into a `HeaderMap` directly.

/// `X-RestLi-Protocol-Version`: sent on requests, required on responses.
pub const HEADER_PROTOCOL_VERSION: &str = "x-restli-protocol-version";

/// `X-RestLi-Method`: canonical operation name of a request.
pub const HEADER_METHOD: &str = "x-restli-method";

/// `X-RestLi-Id`: key of the entity created by a `create` call, in ROR2 form.
pub const HEADER_ID: &str = "x-restli-id";

/// `X-RestLi-Error-Response`: present on responses whose body is a
/// [`RestLiError`](crate::RestLiError).
pub const HEADER_ERROR_RESPONSE: &str = "x-restli-error-response";
