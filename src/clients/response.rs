//! Successful call results.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::clients::errors::ClientError;
use crate::codec::{unmarshal_ror2, DecodeError, Unmarshaler};
use crate::protocol::{CreatedEntity, HEADER_ID};

/// The decoded value of a successful call plus the response head.
///
/// # Example
///
/// ```rust,ignore
/// let response = client.do_and_ignore(request).await?;
/// let created = response.created_entity::<i64>()?;
/// println!("Created widget {} ({})", created.id, created.status);
/// ```
#[derive(Clone, Debug)]
pub struct RestLiResponse<V> {
    /// The decoded body.
    pub value: V,
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
}

impl<V> RestLiResponse<V> {
    /// Returns the decoded body, dropping the response head.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Transforms the decoded body, keeping the response head.
    #[must_use]
    pub fn map<U, F: FnOnce(V) -> U>(self, f: F) -> RestLiResponse<U> {
        RestLiResponse {
            value: f(self.value),
            status: self.status,
            headers: self.headers,
        }
    }

    /// Returns the first value of a header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decodes the key of the created entity from the `X-RestLi-Id` header.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if the header is absent or its value
    /// does not decode as `K`.
    pub fn created_entity<K: Unmarshaler>(&self) -> Result<CreatedEntity<K>, ClientError> {
        let id = self.header(HEADER_ID).ok_or_else(|| DecodeError::Custom {
            path: HEADER_ID.to_string(),
            message: "header is missing".to_string(),
        })?;
        let id = unmarshal_ror2::<K>(id)?.value;
        Ok(CreatedEntity {
            id,
            status: i32::from(self.status.as_u16()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use std::collections::BTreeMap;

    fn response_with_id(id: Option<&'static str>) -> RestLiResponse<()> {
        let mut headers = HeaderMap::new();
        if let Some(id) = id {
            headers.insert(HEADER_ID, HeaderValue::from_static(id));
        }
        RestLiResponse {
            value: (),
            status: StatusCode::CREATED,
            headers,
        }
    }

    #[test]
    fn test_created_entity_simple_key() {
        let created = response_with_id(Some("42")).created_entity::<i64>().unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(created.status, 201);
    }

    #[test]
    fn test_created_entity_complex_key() {
        let created = response_with_id(Some("(region:eu%20west,serial:7)"))
            .created_entity::<BTreeMap<String, String>>()
            .unwrap();
        assert_eq!(created.id["region"], "eu west");
        assert_eq!(created.id["serial"], "7");
    }

    #[test]
    fn test_created_entity_without_header() {
        let result = response_with_id(None).created_entity::<i64>();
        assert!(matches!(
            result,
            Err(ClientError::Decode(DecodeError::Custom { .. }))
        ));
    }

    #[test]
    fn test_map_keeps_head() {
        let response = response_with_id(Some("1")).map(|()| "mapped");
        assert_eq!(response.value, "mapped");
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.header("X-RestLi-Id"), Some("1"));
    }
}
