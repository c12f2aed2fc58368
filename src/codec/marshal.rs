//! The [`Marshaler`] / [`Unmarshaler`] capability pair and its implementations
//! for the rest.li primitive and container types.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::Value;

use crate::codec::errors::{DecodeError, EncodeError};
use crate::codec::path_spec::PathSpec;
use crate::codec::reader::{decode_tree, parse_json, Decoded, Reader};
use crate::codec::ror2;
use crate::codec::writer::{CompactJsonWriter, Encoding, Writer};

/// A value that can write itself to a [`Writer`].
///
/// Records implement this with [`Writer::write_map`], emitting one entry per
/// present field:
///
/// ```rust
/// use restli_client::codec::{EncodeError, Marshaler, Writer};
///
/// struct Widget {
///     id: i64,
///     name: String,
///     description: Option<String>,
/// }
///
/// impl Marshaler for Widget {
///     fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
///         writer.write_map(|fields| {
///             fields.entry("id", |w| w.write_i64(self.id))?;
///             fields.entry("name", |w| w.write_string(&self.name))?;
///             fields.optional("description", self.description.as_deref(), |w, v| w.write_string(v))
///         })
///     }
/// }
/// ```
pub trait Marshaler {
    /// Writes `self` as exactly one value.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if a component cannot be represented.
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError>;
}

/// A value that can be read from a [`Reader`].
///
/// Records implement this with [`Reader::read_record`], which tracks the
/// required fields and leaves absent ones at their default:
///
/// ```rust
/// use restli_client::codec::{DecodeError, Reader, Unmarshaler};
///
/// #[derive(Default)]
/// struct Widget {
///     id: i64,
///     name: String,
/// }
///
/// impl Unmarshaler for Widget {
///     fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
///         let mut widget = Self::default();
///         reader.read_record(&["id", "name"], |reader, field| {
///             match field {
///                 "id" => widget.id = reader.read_i64()?,
///                 "name" => widget.name = reader.read_string()?,
///                 _ => reader.skip()?,
///             }
///             Ok(())
///         })?;
///         Ok(widget)
///     }
/// }
/// ```
pub trait Unmarshaler: Sized {
    /// Reads a value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] on malformed input or a type mismatch.
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError>;
}

/// A decode function for a caller-chosen type.
pub type GenericUnmarshaler<V> = fn(Reader<'_>) -> Result<V, DecodeError>;

/// Serializes `value` as compact JSON, dropping the `excluded` fields.
///
/// # Errors
///
/// Returns [`EncodeError`] if the value cannot be represented.
pub fn marshal_json<M>(value: &M, excluded: PathSpec) -> Result<bytes::Bytes, EncodeError>
where
    M: Marshaler + ?Sized,
{
    let mut writer = CompactJsonWriter::with_excluded_fields(excluded);
    value.marshal_rest_li(writer.writer())?;
    Ok(writer.finish())
}

/// Serializes `value` in the ROR2 URI form.
///
/// # Errors
///
/// Returns [`EncodeError`] if the value cannot be represented.
pub fn marshal_ror2<M>(value: &M) -> Result<String, EncodeError>
where
    M: Marshaler + ?Sized,
{
    let mut buf = Vec::new();
    value.marshal_rest_li(Writer::new(&mut buf, Encoding::Ror2, PathSpec::empty_ref()))?;
    String::from_utf8(buf).map_err(EncodeError::custom)
}

/// Deserializes a JSON document.
///
/// # Errors
///
/// Returns [`DecodeError`] on malformed JSON or a structural mismatch.
/// Missing required fields are reported in [`Decoded::missing_fields`].
pub fn unmarshal_json<V: Unmarshaler>(data: &[u8]) -> Result<Decoded<V>, DecodeError> {
    let tree = parse_json(data)?;
    decode_tree(&tree, Encoding::Json, V::unmarshal_rest_li)
}

/// Deserializes a ROR2 value (e.g. an `X-RestLi-Id` header or a batch key).
///
/// # Errors
///
/// Returns [`DecodeError`] on malformed ROR2 or a structural mismatch.
pub fn unmarshal_ror2<V: Unmarshaler>(text: &str) -> Result<Decoded<V>, DecodeError> {
    let tree = ror2::parse(text)?;
    decode_tree(&tree, Encoding::Ror2, V::unmarshal_rest_li)
}

/// Rest.li `bytes`: raw octets carried as a string of code points U+0000..U+00FF.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RawBytes(pub Vec<u8>);

impl Marshaler for RawBytes {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        writer.write_bytes(&self.0)
    }
}

impl Unmarshaler for RawBytes {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        reader.read_bytes().map(Self)
    }
}

impl<T: Marshaler + ?Sized> Marshaler for &T {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        (**self).marshal_rest_li(writer)
    }
}

impl<T: Marshaler + ?Sized> Marshaler for Box<T> {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        (**self).marshal_rest_li(writer)
    }
}

impl<T: Unmarshaler> Unmarshaler for Box<T> {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        T::unmarshal_rest_li(reader).map(Self::new)
    }
}

impl Marshaler for str {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        writer.write_string(self)
    }
}

impl Marshaler for String {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        writer.write_string(self)
    }
}

impl Unmarshaler for String {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        reader.read_string()
    }
}

macro_rules! scalar {
    ($ty:ty, $write:ident, $read:ident) => {
        impl Marshaler for $ty {
            fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
                writer.$write(*self)
            }
        }

        impl Unmarshaler for $ty {
            fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
                reader.$read()
            }
        }
    };
}

scalar!(bool, write_bool, read_bool);
scalar!(i32, write_i32, read_i32);
scalar!(i64, write_i64, read_i64);
scalar!(f32, write_f32, read_f32);
scalar!(f64, write_f64, read_f64);

impl<T: Marshaler> Marshaler for [T] {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        writer.write_array(|items| {
            self.iter()
                .try_for_each(|item| item.marshal_rest_li(items.item()))
        })
    }
}

impl<T: Marshaler> Marshaler for Vec<T> {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        self.as_slice().marshal_rest_li(writer)
    }
}

impl<T: Unmarshaler> Unmarshaler for Vec<T> {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut items = Vec::new();
        reader.read_array(|item| {
            items.push(T::unmarshal_rest_li(item)?);
            Ok(())
        })?;
        Ok(items)
    }
}

impl<T: Marshaler> Marshaler for BTreeMap<String, T> {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        writer.write_map(|fields| {
            self.iter()
                .try_for_each(|(k, v)| fields.entry(k, |w| v.marshal_rest_li(w)))
        })
    }
}

impl<T: Unmarshaler> Unmarshaler for BTreeMap<String, T> {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut map = Self::new();
        reader.read_map(|value, key| {
            map.insert(key.to_string(), T::unmarshal_rest_li(value)?);
            Ok(())
        })?;
        Ok(map)
    }
}

// Keys are written in sorted order so equal maps always encode identically.
impl<T: Marshaler, S: BuildHasher> Marshaler for HashMap<String, T, S> {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        writer.write_map(|fields| {
            entries
                .into_iter()
                .try_for_each(|(k, v)| fields.entry(k, |w| v.marshal_rest_li(w)))
        })
    }
}

impl<T: Unmarshaler, S: BuildHasher + Default> Unmarshaler for HashMap<String, T, S> {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut map = Self::default();
        reader.read_map(|value, key| {
            map.insert(key.to_string(), T::unmarshal_rest_li(value)?);
            Ok(())
        })?;
        Ok(map)
    }
}

impl<T: Unmarshaler> Unmarshaler for Option<T> {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        if reader.is_null() {
            reader.skip()?;
            return Ok(None);
        }
        T::unmarshal_rest_li(reader).map(Some)
    }
}

impl Marshaler for Value {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        writer.write_raw(self)
    }
}

impl Unmarshaler for Value {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        Ok(reader.read_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_string<M: Marshaler + ?Sized>(value: &M) -> String {
        String::from_utf8(marshal_json(value, PathSpec::empty()).unwrap().to_vec()).unwrap()
    }

    #[test]
    fn test_marshal_containers_to_json() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), vec![1_i64, 2]);
        map.insert("a".to_string(), Vec::new());
        assert_eq!(json_string(&map), r#"{"a":[],"b":[1,2]}"#);
    }

    #[test]
    fn test_hash_map_is_written_in_sorted_order() {
        let map: HashMap<String, i32> = [("z", 1), ("m", 2), ("a", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(json_string(&map), r#"{"a":3,"m":2,"z":1}"#);
        assert_eq!(marshal_ror2(&map).unwrap(), "(a:3,m:2,z:1)");
    }

    #[test]
    fn test_unmarshal_containers_from_json() {
        let decoded: Decoded<BTreeMap<String, Vec<String>>> =
            unmarshal_json(br#"{"k":["x","y"]}"#).unwrap();
        assert_eq!(decoded.value["k"], vec!["x", "y"]);
    }

    #[test]
    fn test_option_reads_null_as_none() {
        let decoded: Decoded<Vec<Option<i32>>> = unmarshal_json(b"[1,null]").unwrap();
        assert_eq!(decoded.value, vec![Some(1), None]);
    }

    #[test]
    fn test_ror2_round_trip_of_complex_key() {
        let mut key = BTreeMap::new();
        key.insert("major".to_string(), "a,b".to_string());
        key.insert("minor".to_string(), String::new());

        let text = marshal_ror2(&key).unwrap();
        assert_eq!(text, "(major:a%2Cb,minor:'')");

        let decoded: Decoded<BTreeMap<String, String>> = unmarshal_ror2(&text).unwrap();
        assert_eq!(decoded.value, key);
    }

    #[test]
    fn test_raw_bytes() {
        let bytes = RawBytes(vec![0, 0x7f, 0xff]);
        let data = marshal_json(&bytes, PathSpec::empty()).unwrap();
        let decoded: Decoded<RawBytes> = unmarshal_json(&data).unwrap();
        assert_eq!(decoded.value, bytes);
    }

    #[test]
    fn test_untyped_value_passes_through() {
        let value = serde_json::json!({"nested": {"list": [1, "two", null]}});
        let data = marshal_json(&value, PathSpec::empty()).unwrap();
        let decoded: Decoded<Value> = unmarshal_json(&data).unwrap();
        assert_eq!(decoded.value, value);
    }

    #[test]
    fn test_marshal_non_finite_float_fails() {
        assert!(matches!(
            marshal_ror2(&f64::INFINITY),
            Err(EncodeError::NonFiniteNumber { .. })
        ));
    }
}
