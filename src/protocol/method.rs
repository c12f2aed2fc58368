//! The closed set of rest.li operation kinds.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use reqwest::Method;
use thiserror::Error;

/// A rest.li operation kind, sent in the `X-RestLi-Method` header.
///
/// # Example
///
/// ```rust
/// use restli_client::RestLiMethod;
///
/// let method: RestLiMethod = "batch_partial_update".parse().unwrap();
/// assert_eq!(method, RestLiMethod::BatchPartialUpdate);
/// assert_eq!(method.to_string(), "batch_partial_update");
/// assert_eq!(method.http_method(), reqwest::Method::POST);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RestLiMethod {
    /// Fetch one entity.
    Get,
    /// Create one entity.
    Create,
    /// Delete one entity.
    Delete,
    /// Replace one entity.
    Update,
    /// Patch one entity.
    PartialUpdate,
    /// Fetch several entities by key.
    BatchGet,
    /// Create several entities.
    BatchCreate,
    /// Delete several entities by key.
    BatchDelete,
    /// Replace several entities by key.
    BatchUpdate,
    /// Patch several entities by key.
    BatchPartialUpdate,
    /// Fetch the whole collection.
    GetAll,
    /// Invoke a named action.
    Action,
    /// Run a named finder query.
    Finder,
}

impl RestLiMethod {
    /// Every operation kind, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Get,
        Self::Create,
        Self::Delete,
        Self::Update,
        Self::PartialUpdate,
        Self::BatchGet,
        Self::BatchCreate,
        Self::BatchDelete,
        Self::BatchUpdate,
        Self::BatchPartialUpdate,
        Self::GetAll,
        Self::Action,
        Self::Finder,
    ];

    /// Returns the canonical lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Update => "update",
            Self::PartialUpdate => "partial_update",
            Self::BatchGet => "batch_get",
            Self::BatchCreate => "batch_create",
            Self::BatchDelete => "batch_delete",
            Self::BatchUpdate => "batch_update",
            Self::BatchPartialUpdate => "batch_partial_update",
            Self::GetAll => "get_all",
            Self::Action => "action",
            Self::Finder => "finder",
        }
    }

    /// Returns the HTTP verb this operation is sent with.
    #[must_use]
    pub fn http_method(&self) -> Method {
        match self {
            Self::Get | Self::BatchGet | Self::GetAll | Self::Finder => Method::GET,
            Self::Create
            | Self::PartialUpdate
            | Self::BatchCreate
            | Self::BatchPartialUpdate
            | Self::Action => Method::POST,
            Self::Update | Self::BatchUpdate => Method::PUT,
            Self::Delete | Self::BatchDelete => Method::DELETE,
        }
    }

    fn by_name() -> &'static HashMap<&'static str, Self> {
        static TABLE: OnceLock<HashMap<&'static str, RestLiMethod>> = OnceLock::new();
        TABLE.get_or_init(|| Self::ALL.iter().map(|m| (m.as_str(), *m)).collect())
    }
}

impl fmt::Display for RestLiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown operation name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown rest.li method '{name}'.")]
pub struct UnknownRestLiMethodError {
    /// The name that was not recognized.
    pub name: String,
}

impl FromStr for RestLiMethod {
    type Err = UnknownRestLiMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::by_name()
            .get(s)
            .copied()
            .ok_or_else(|| UnknownRestLiMethodError {
                name: s.to_string(),
            })
    }
}
