//! Query string encoding.
//!
//! Parameters are kept in a sorted map, so equal parameter sets always render
//! byte-identical query strings (and therefore byte-identical URLs).

use std::collections::BTreeMap;

use crate::codec::{marshal_ror2, EncodeError, Marshaler};

const FINDER_PARAM: &str = "q";
const IDS_PARAM: &str = "ids";
const ACTION_PARAM: &str = "action";

/// Renders the query string of a request.
pub trait QueryParamsEncoder {
    /// Renders `name=value` pairs joined by `&`, without a leading `?`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if a parameter value cannot be encoded.
    fn encode_query_params(&self) -> Result<String, EncodeError>;
}

/// The query suffix of a request URL.
#[derive(Clone, Copy, Default)]
pub enum Query<'a> {
    /// No query string.
    #[default]
    None,
    /// `?action=<name>`.
    Action(&'a str),
    /// `?<encoded parameters>`.
    Params(&'a dyn QueryParamsEncoder),
}

impl Query<'_> {
    /// Renders the query string, or `None` when the request has none.
    pub(crate) fn encode(&self) -> Result<Option<String>, EncodeError> {
        match self {
            Self::None => Ok(None),
            Self::Action(name) => Ok(Some(format!(
                "{ACTION_PARAM}={}",
                urlencoding::encode(name)
            ))),
            Self::Params(params) => params.encode_query_params().map(Some),
        }
    }
}

impl std::fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Action(name) => f.debug_tuple("Action").field(name).finish(),
            Self::Params(params) => f
                .debug_tuple("Params")
                .field(&params.encode_query_params())
                .finish(),
        }
    }
}

/// A set of query parameters with ROR2-encoded values.
///
/// # Example
///
/// ```rust
/// use restli_client::{QueryParams, QueryParamsEncoder};
///
/// let params = QueryParams::new()
///     .finder("search")
///     .add("keyword", "blue widget")
///     .unwrap()
///     .add("limit", &10_i32)
///     .unwrap();
///
/// assert_eq!(
///     params.encode_query_params().unwrap(),
///     "keyword=blue%20widget&limit=10&q=search"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Sets a parameter, replacing any previous value of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the value cannot be encoded.
    pub fn add<V: Marshaler + ?Sized>(mut self, name: &str, value: &V) -> Result<Self, EncodeError> {
        let encoded = marshal_ror2(value)?;
        self.params
            .insert(urlencoding::encode(name).into_owned(), encoded);
        Ok(self)
    }

    /// Sets an optional parameter; `None` leaves the set unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the value cannot be encoded.
    pub fn add_optional<V: Marshaler>(self, name: &str, value: Option<&V>) -> Result<Self, EncodeError> {
        match value {
            Some(value) => self.add(name, value),
            None => Ok(self),
        }
    }

    /// Selects a finder (`q=<name>`).
    #[must_use]
    pub fn finder(mut self, name: &str) -> Self {
        self.params.insert(
            FINDER_PARAM.to_string(),
            urlencoding::encode(name).into_owned(),
        );
        self
    }

    /// Sets the entity keys of a batch operation (`ids=List(...)`).
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if a key cannot be encoded.
    pub fn ids<K: Marshaler>(self, keys: &[K]) -> Result<Self, EncodeError> {
        self.add(IDS_PARAM, keys)
    }
}

impl QueryParamsEncoder for QueryParams {
    fn encode_query_params(&self) -> Result<String, EncodeError> {
        let mut query = String::new();
        for (name, value) in &self.params {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(name);
            query.push('=');
            query.push_str(value);
        }
        Ok(query)
    }
}
