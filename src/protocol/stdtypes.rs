//! Payload types shared by every rest.li resource.

use crate::clients::RestLiError;
use crate::codec::{unmarshal_ror2, DecodeError, EncodeError, Marshaler, Reader, Unmarshaler, Writer};

/// A record with no fields. Any fields present on the wire are skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EmptyRecord;

impl Marshaler for EmptyRecord {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        writer.write_map(|_| Ok(()))
    }
}

impl Unmarshaler for EmptyRecord {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        reader.read_map(|value, _| value.skip())?;
        Ok(Self)
    }
}

/// The outcome of a create: the new entity's key and the HTTP status.
///
/// Single creates take the key from the `X-RestLi-Id` header (see
/// [`RestLiResponse::created_entity`](crate::RestLiResponse::created_entity));
/// batch creates return one of these per element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedEntity<K> {
    /// Key of the created entity.
    pub id: K,
    /// HTTP status of this create.
    pub status: i32,
}

impl<K: Unmarshaler + Default> Unmarshaler for CreatedEntity<K> {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut id = K::default();
        let mut status = 0;
        reader.read_record(&["id", "status"], |reader, field| {
            match field {
                "id" => {
                    let text = reader.read_string()?;
                    id = unmarshal_ror2::<K>(&text)?.value;
                }
                "status" => status = reader.read_i32()?,
                _ => reader.skip()?,
            }
            Ok(())
        })?;
        Ok(Self { id, status })
    }
}

/// Paging information attached to collection results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionMetadata {
    /// Index of the first returned element.
    pub start: i32,
    /// Page size requested.
    pub count: i32,
    /// Total number of elements, when the server knows it.
    pub total: Option<i32>,
}

impl Unmarshaler for CollectionMetadata {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut paging = Self::default();
        reader.read_record(&["start", "count"], |reader, field| {
            match field {
                "start" => paging.start = reader.read_i32()?,
                "count" => paging.count = reader.read_i32()?,
                "total" => paging.total = Some(reader.read_i32()?),
                _ => reader.skip()?,
            }
            Ok(())
        })?;
        Ok(paging)
    }
}

/// The result of a `get_all` or finder call.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionResponse<V> {
    /// Returned entities, in server order.
    pub elements: Vec<V>,
    /// Paging information, if the server sent any.
    pub paging: Option<CollectionMetadata>,
}

/// Finder calls return a plain collection response.
pub type FinderResults<V> = CollectionResponse<V>;

impl<V> Default for CollectionResponse<V> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            paging: None,
        }
    }
}

impl<V: Unmarshaler> Unmarshaler for CollectionResponse<V> {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut response = Self::default();
        reader.read_record(&["elements"], |reader, field| {
            match field {
                "elements" => response.elements = Vec::<V>::unmarshal_rest_li(reader)?,
                "paging" => response.paging = Some(CollectionMetadata::unmarshal_rest_li(reader)?),
                _ => reader.skip()?,
            }
            Ok(())
        })?;
        Ok(response)
    }
}

/// The per-key status of a batch update, partial update or delete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchEntityUpdateResponse {
    /// HTTP status for this key.
    pub status: i32,
}

impl Unmarshaler for BatchEntityUpdateResponse {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut response = Self::default();
        reader.read_record(&["status"], |reader, field| {
            match field {
                "status" => response.status = reader.read_i32()?,
                _ => reader.skip()?,
            }
            Ok(())
        })?;
        Ok(response)
    }
}

/// The result of a batch call: per-key values and per-key errors.
///
/// Keys arrive as ROR2 text in the map keys of the payload and are decoded
/// into `K`. Entries keep the server's order.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchResponse<K, V> {
    /// Successful entries.
    pub results: Vec<(K, V)>,
    /// Failed entries.
    pub errors: Vec<(K, RestLiError)>,
}

impl<K, V> Default for BatchResponse<K, V> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<K: PartialEq, V> BatchResponse<K, V> {
    /// Returns the value for `key`, if it succeeded.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.results.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the error for `key`, if it failed.
    #[must_use]
    pub fn error(&self, key: &K) -> Option<&RestLiError> {
        self.errors.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }
}

fn read_keyed<K, T, F>(reader: Reader<'_>, into: &mut Vec<(K, T)>, mut read: F) -> Result<(), DecodeError>
where
    K: Unmarshaler,
    F: FnMut(Reader<'_>) -> Result<T, DecodeError>,
{
    reader.read_map(|value, key| {
        let key = unmarshal_ror2::<K>(key)?.value;
        into.push((key, read(value)?));
        Ok(())
    })
}

impl<K: Unmarshaler, V: Unmarshaler> Unmarshaler for BatchResponse<K, V> {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut response = Self::default();
        reader.read_record(&["results"], |reader, field| match field {
            "results" => read_keyed(reader, &mut response.results, V::unmarshal_rest_li),
            "errors" => read_keyed(reader, &mut response.errors, RestLiError::unmarshal_rest_li),
            _ => reader.skip(),
        })?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{marshal_json, unmarshal_json, Decoded, PathSpec};

    #[test]
    fn test_empty_record_skips_everything() {
        let decoded: Decoded<EmptyRecord> = unmarshal_json(br#"{"a":1,"b":{"c":[]}}"#).unwrap();
        assert_eq!(decoded.value, EmptyRecord);
        assert_eq!(&marshal_json(&EmptyRecord, PathSpec::empty()).unwrap()[..], b"{}");
    }

    #[test]
    fn test_collection_response_with_paging() {
        let body = br#"{"elements":["a","b"],"paging":{"start":0,"count":2,"total":5,"links":[]}}"#;
        let decoded: Decoded<CollectionResponse<String>> = unmarshal_json(body).unwrap();

        assert!(decoded.is_complete());
        assert_eq!(decoded.value.elements, vec!["a", "b"]);
        assert_eq!(
            decoded.value.paging,
            Some(CollectionMetadata {
                start: 0,
                count: 2,
                total: Some(5),
            })
        );
    }

    #[test]
    fn test_collection_response_missing_elements() {
        let decoded: Decoded<CollectionResponse<i64>> = unmarshal_json(b"{}").unwrap();
        assert_eq!(decoded.missing_fields, vec!["elements"]);
        assert!(decoded.value.elements.is_empty());
    }

    #[test]
    fn test_batch_response_decodes_keys() {
        let body = br#"{
            "results": {"1": {"status": 204}, "2": {"status": 200}},
            "errors": {"3": {"status": 404, "message": "gone"}}
        }"#;
        let decoded: Decoded<BatchResponse<i64, BatchEntityUpdateResponse>> =
            unmarshal_json(body).unwrap();
        let response = decoded.value;

        assert_eq!(response.get(&1), Some(&BatchEntityUpdateResponse { status: 204 }));
        assert_eq!(response.get(&2).map(|r| r.status), Some(200));
        assert_eq!(response.error(&3).map(|e| e.status), Some(404));
        assert!(response.get(&3).is_none());
    }

    #[test]
    fn test_batch_response_with_complex_keys() {
        let body = br#"{"results": {"(a:1,b:x%20y)": "value"}}"#;
        let decoded: Decoded<BatchResponse<std::collections::BTreeMap<String, String>, String>> =
            unmarshal_json(body).unwrap();

        let (key, value) = &decoded.value.results[0];
        assert_eq!(key["a"], "1");
        assert_eq!(key["b"], "x y");
        assert_eq!(value, "value");
    }

    #[test]
    fn test_batch_response_rejects_malformed_key() {
        let body = br#"{"results": {"(a:1": "value"}}"#;
        let result: Result<Decoded<BatchResponse<i64, String>>, _> = unmarshal_json(body);
        assert!(matches!(result, Err(DecodeError::MalformedRor2 { .. })));
    }

    #[test]
    fn test_created_entities_in_batch_create() {
        let body = br#"{"elements":[{"id":"17","status":201},{"id":"18","status":201}]}"#;
        let decoded: Decoded<CollectionResponse<CreatedEntity<i64>>> = unmarshal_json(body).unwrap();

        let ids: Vec<i64> = decoded.value.elements.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![17, 18]);
        assert!(decoded.value.elements.iter().all(|e| e.status == 201));
    }
}
