//! Encoding and decoding of rest.li payloads.
//!
//! Generated record types implement [`Marshaler`] and [`Unmarshaler`] against
//! the streaming [`Writer`] and tree-backed [`Reader`] defined here. The same
//! capability pair serves two syntaxes:
//!
//! - [`Encoding::Json`]: compact JSON request and response bodies
//! - [`Encoding::Ror2`]: the rest.li 2.0 URI form used for keys and query
//!   parameters (see [`ror2`])
//!
//! # Overview
//!
//! - [`PathSpec`]: field paths to drop while writing (read-only fields)
//! - [`CompactJsonWriter`]: buffered JSON body with a known size
//! - [`Decoded`]: a decoded value plus the required fields that were absent
//! - [`MissingRequiredFieldsError`]: strict-mode failure that keeps the
//!   partial value
//!
//! # Example
//!
//! ```rust
//! use restli_client::codec::{marshal_ror2, unmarshal_json, Decoded};
//!
//! let decoded: Decoded<Vec<i64>> = unmarshal_json(b"[1,2,3]").unwrap();
//! assert_eq!(decoded.value, vec![1, 2, 3]);
//!
//! assert_eq!(marshal_ror2(&decoded.value).unwrap(), "List(1,2,3)");
//! ```

mod errors;
mod marshal;
mod path_spec;
mod reader;
pub mod ror2;
mod writer;

pub use errors::{DecodeError, EncodeError, MissingRequiredFieldsError, PathSpecError};
pub use marshal::{
    marshal_json, marshal_ror2, unmarshal_json, unmarshal_ror2, GenericUnmarshaler, Marshaler,
    RawBytes, Unmarshaler,
};
pub use path_spec::{PathSpec, Projection, WILDCARD};
pub use reader::{decode_tree, parse_json, Decoded, Reader};
pub use writer::{ArrayWriter, CompactJsonWriter, Encoding, MapWriter, Writer};
