//! Streaming writers for JSON bodies and ROR2 URI values.
//!
//! A [`Writer`] writes exactly one value. Maps are written through a
//! [`MapWriter`], which consults the active [`PathSpec`] before emitting each
//! field: an excluded field produces no output at all, not even its key.
//!
//! # Example
//!
//! ```rust
//! use restli_client::codec::{CompactJsonWriter, PathSpec};
//!
//! let mut writer = CompactJsonWriter::with_excluded_fields(PathSpec::new(["id"]).unwrap());
//! writer
//!     .writer()
//!     .write_map(|fields| {
//!         fields.entry("id", |w| w.write_i64(42))?;
//!         fields.entry("name", |w| w.write_string("widget"))
//!     })
//!     .unwrap();
//!
//! assert_eq!(writer.size(), 17);
//! assert_eq!(&writer.finish()[..], br#"{"name":"widget"}"#);
//! ```

use std::fmt::Display;

use bytes::Bytes;

use crate::codec::errors::EncodeError;
use crate::codec::path_spec::PathSpec;
use crate::codec::ror2;

/// Output syntax produced by a [`Writer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Compact JSON, used for request bodies.
    Json,
    /// Rest.li 2.0 URI form, used for keys and query values.
    Ror2,
}

/// Writes a single value into a shared buffer.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut Vec<u8>,
    encoding: Encoding,
    projection: &'a PathSpec,
    path: String,
}

impl<'a> Writer<'a> {
    /// Creates a writer that appends to `buf`.
    #[must_use]
    pub fn new(buf: &'a mut Vec<u8>, encoding: Encoding, projection: &'a PathSpec) -> Self {
        Self {
            buf,
            encoding,
            projection,
            path: String::new(),
        }
    }

    /// The encoding this writer produces.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Dotted path of the value being written, relative to the root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn write_text(self, text: &str) -> Result<(), EncodeError> {
        match self.encoding {
            Encoding::Json => {
                serde_json::to_writer(&mut *self.buf, text).map_err(EncodeError::custom)?;
            }
            Encoding::Ror2 => self.buf.extend_from_slice(ror2::escape(text).as_bytes()),
        }
        Ok(())
    }

    fn write_display(self, value: impl Display) -> Result<(), EncodeError> {
        self.buf.extend_from_slice(value.to_string().as_bytes());
        Ok(())
    }

    /// Writes a string.
    pub fn write_string(self, value: &str) -> Result<(), EncodeError> {
        self.write_text(value)
    }

    /// Writes a boolean.
    pub fn write_bool(self, value: bool) -> Result<(), EncodeError> {
        self.write_display(value)
    }

    /// Writes a 32-bit integer.
    pub fn write_i32(self, value: i32) -> Result<(), EncodeError> {
        self.write_display(value)
    }

    /// Writes a 64-bit integer.
    pub fn write_i64(self, value: i64) -> Result<(), EncodeError> {
        self.write_display(value)
    }

    /// Writes a 32-bit float.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::NonFiniteNumber`] for NaN and infinities.
    pub fn write_f32(self, value: f32) -> Result<(), EncodeError> {
        self.write_f64(f64::from(value))
    }

    /// Writes a 64-bit float.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::NonFiniteNumber`] for NaN and infinities.
    pub fn write_f64(self, value: f64) -> Result<(), EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NonFiniteNumber {
                value: value.to_string(),
                path: self.path,
            });
        }
        match self.encoding {
            Encoding::Json => {
                serde_json::to_writer(&mut *self.buf, &value).map_err(EncodeError::custom)?;
                Ok(())
            }
            Encoding::Ror2 => self.write_display(value),
        }
    }

    /// Writes rest.li `bytes`: each byte becomes the code point of the same value.
    pub fn write_bytes(self, value: &[u8]) -> Result<(), EncodeError> {
        let text: String = value.iter().copied().map(char::from).collect();
        self.write_text(&text)
    }

    /// Writes an enum symbol.
    pub fn write_symbol(self, symbol: &str) -> Result<(), EncodeError> {
        self.write_text(symbol)
    }

    /// Writes untyped data (e.g. error details of an unknown schema).
    ///
    /// JSON `null` has no ROR2 form and is written as the empty string there.
    pub fn write_raw(self, value: &serde_json::Value) -> Result<(), EncodeError> {
        use serde_json::Value;

        if self.encoding == Encoding::Json {
            serde_json::to_writer(&mut *self.buf, value).map_err(EncodeError::custom)?;
            return Ok(());
        }
        match value {
            Value::Null => self.write_string(""),
            Value::Bool(b) => self.write_bool(*b),
            Value::Number(n) => self.write_display(n),
            Value::String(s) => self.write_string(s),
            Value::Array(items) => self.write_array(|array| {
                items.iter().try_for_each(|item| array.item().write_raw(item))
            }),
            Value::Object(entries) => self.write_map(|fields| {
                entries
                    .iter()
                    .try_for_each(|(k, v)| fields.entry(k, |w| w.write_raw(v)))
            }),
        }
    }

    /// Writes a map. `emit` is called once and writes each field through the
    /// [`MapWriter`]; fields excluded by the active projection are dropped.
    pub fn write_map<F>(self, emit: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut MapWriter<'_>) -> Result<(), EncodeError>,
    {
        let open: &[u8] = match self.encoding {
            Encoding::Json => b"{",
            Encoding::Ror2 => b"(",
        };
        let close = match self.encoding {
            Encoding::Json => b'}',
            Encoding::Ror2 => b')',
        };

        self.buf.extend_from_slice(open);
        let mut map = MapWriter {
            buf: self.buf,
            encoding: self.encoding,
            projection: self.projection,
            path: self.path,
            first: true,
        };
        emit(&mut map)?;
        map.buf.push(close);
        Ok(())
    }

    /// Writes an array. Items inherit the projection of the array itself.
    pub fn write_array<F>(self, emit: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut ArrayWriter<'_>) -> Result<(), EncodeError>,
    {
        let open: &[u8] = match self.encoding {
            Encoding::Json => b"[",
            Encoding::Ror2 => ror2::LIST_PREFIX.as_bytes(),
        };
        let close = match self.encoding {
            Encoding::Json => b']',
            Encoding::Ror2 => b')',
        };

        self.buf.extend_from_slice(open);
        let mut array = ArrayWriter {
            buf: self.buf,
            encoding: self.encoding,
            projection: self.projection,
            path: self.path,
            index: 0,
        };
        emit(&mut array)?;
        array.buf.push(close);
        Ok(())
    }
}

/// Writes the fields of a map, honoring the active projection.
#[derive(Debug)]
pub struct MapWriter<'a> {
    buf: &'a mut Vec<u8>,
    encoding: Encoding,
    projection: &'a PathSpec,
    path: String,
    first: bool,
}

impl MapWriter<'_> {
    /// Starts a field and returns the writer for its value.
    ///
    /// Returns `Ok(None)` if the field is excluded; nothing is written in
    /// that case. When a writer is returned the caller must write exactly one
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the key cannot be written.
    pub fn field(&mut self, key: &str) -> Result<Option<Writer<'_>>, EncodeError> {
        let Some(projection) = self.projection.lookup(key).into_child() else {
            return Ok(None);
        };

        if !self.first {
            self.buf.push(b',');
        }
        self.first = false;

        match self.encoding {
            Encoding::Json => {
                serde_json::to_writer(&mut *self.buf, key).map_err(EncodeError::custom)?;
            }
            Encoding::Ror2 => self.buf.extend_from_slice(ror2::escape(key).as_bytes()),
        }
        self.buf.push(b':');

        Ok(Some(Writer {
            buf: &mut *self.buf,
            encoding: self.encoding,
            projection,
            path: join_path(&self.path, key),
        }))
    }

    /// Writes a field with `write` unless it is excluded.
    pub fn entry<F>(&mut self, key: &str, write: F) -> Result<(), EncodeError>
    where
        F: FnOnce(Writer<'_>) -> Result<(), EncodeError>,
    {
        match self.field(key)? {
            Some(writer) => write(writer),
            None => Ok(()),
        }
    }

    /// Writes an optional field; `None` omits it entirely.
    pub fn optional<T, F>(&mut self, key: &str, value: Option<T>, write: F) -> Result<(), EncodeError>
    where
        F: FnOnce(Writer<'_>, T) -> Result<(), EncodeError>,
    {
        match value {
            Some(value) => self.entry(key, |w| write(w, value)),
            None => Ok(()),
        }
    }
}

/// Writes the items of an array.
#[derive(Debug)]
pub struct ArrayWriter<'a> {
    buf: &'a mut Vec<u8>,
    encoding: Encoding,
    projection: &'a PathSpec,
    path: String,
    index: usize,
}

impl ArrayWriter<'_> {
    /// Returns the writer for the next item.
    pub fn item(&mut self) -> Writer<'_> {
        if self.index > 0 {
            self.buf.push(b',');
        }
        let path = join_path(&self.path, &self.index.to_string());
        self.index += 1;

        Writer {
            buf: &mut *self.buf,
            encoding: self.encoding,
            projection: self.projection,
            path,
        }
    }
}

pub(crate) fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}

/// A buffered JSON writer that owns its output and its exclusion tree.
///
/// The buffered size is available before the content is handed off, so the
/// caller can set `Content-Length`; [`finish`](Self::finish) consumes the
/// writer, making the buffered content readable exactly once.
#[derive(Debug, Default)]
pub struct CompactJsonWriter {
    buf: Vec<u8>,
    excluded: PathSpec,
}

impl CompactJsonWriter {
    /// Creates a writer that excludes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer that drops every field named by `excluded`.
    #[must_use]
    pub const fn with_excluded_fields(excluded: PathSpec) -> Self {
        Self {
            buf: Vec::new(),
            excluded,
        }
    }

    /// Returns a writer for the root value.
    pub fn writer(&mut self) -> Writer<'_> {
        Writer::new(&mut self.buf, Encoding::Json, &self.excluded)
    }

    /// Number of bytes buffered so far.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Hands off the buffered content.
    #[must_use]
    pub fn finish(self) -> Bytes {
        Bytes::from(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(projection: &PathSpec, write: impl FnOnce(Writer<'_>) -> Result<(), EncodeError>) -> String {
        let mut buf = Vec::new();
        write(Writer::new(&mut buf, Encoding::Json, projection)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn ror2(write: impl FnOnce(Writer<'_>) -> Result<(), EncodeError>) -> String {
        let mut buf = Vec::new();
        write(Writer::new(&mut buf, Encoding::Ror2, PathSpec::empty_ref())).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_json_scalars() {
        let empty = PathSpec::empty();
        assert_eq!(json(&empty, |w| w.write_string("a\"b")), r#""a\"b""#);
        assert_eq!(json(&empty, |w| w.write_i64(-7)), "-7");
        assert_eq!(json(&empty, |w| w.write_bool(true)), "true");
        assert_eq!(json(&empty, |w| w.write_f64(1.5)), "1.5");
    }

    #[test]
    fn test_json_map_and_array() {
        let empty = PathSpec::empty();
        let out = json(&empty, |w| {
            w.write_map(|fields| {
                fields.entry("id", |w| w.write_i32(1))?;
                fields.entry("tags", |w| {
                    w.write_array(|items| {
                        items.item().write_string("x")?;
                        items.item().write_string("y")
                    })
                })
            })
        });
        assert_eq!(out, r#"{"id":1,"tags":["x","y"]}"#);
    }

    #[test]
    fn test_excluded_field_emits_no_key() {
        let spec = PathSpec::new(["secret"]).unwrap();
        let out = json(&spec, |w| {
            w.write_map(|fields| {
                fields.entry("secret", |w| w.write_string("hunter2"))?;
                fields.entry("name", |w| w.write_string("n"))
            })
        });
        assert_eq!(out, r#"{"name":"n"}"#);
    }

    #[test]
    fn test_field_escapes_keys_and_skips_excluded() {
        let spec = PathSpec::new(["secret"]).unwrap();
        let out = json(&spec, |w| {
            w.write_map(|fields| {
                assert!(fields.field("secret")?.is_none());
                let Some(value) = fields.field("say \"hi\"")? else {
                    panic!("field should not be excluded");
                };
                assert_eq!(value.path(), "say \"hi\"");
                value.write_i32(1)
            })
        });
        assert_eq!(out, r#"{"say \"hi\"":1}"#);
    }

    #[test]
    fn test_projection_descends_into_nested_maps_and_arrays() {
        let spec = PathSpec::new(["owner/token", "items/secret"]).unwrap();
        let out = json(&spec, |w| {
            w.write_map(|fields| {
                fields.entry("owner", |w| {
                    w.write_map(|owner| {
                        owner.entry("token", |w| w.write_string("t"))?;
                        owner.entry("name", |w| w.write_string("o"))
                    })
                })?;
                fields.entry("items", |w| {
                    w.write_array(|items| {
                        items.item().write_map(|item| {
                            item.entry("secret", |w| w.write_i32(1))?;
                            item.entry("id", |w| w.write_i32(2))
                        })
                    })
                })
            })
        });
        assert_eq!(out, r#"{"owner":{"name":"o"},"items":[{"id":2}]}"#);
    }

    #[test]
    fn test_optional_field_none_is_omitted() {
        let empty = PathSpec::empty();
        let out = json(&empty, |w| {
            w.write_map(|fields| {
                fields.optional("a", None::<i32>, |w, v| w.write_i32(v))?;
                fields.optional("b", Some(2), |w, v| w.write_i32(v))
            })
        });
        assert_eq!(out, r#"{"b":2}"#);
    }

    #[test]
    fn test_non_finite_float_reports_path() {
        let empty = PathSpec::empty();
        let mut buf = Vec::new();
        let err = Writer::new(&mut buf, Encoding::Json, &empty)
            .write_map(|fields| fields.entry("ratio", |w| w.write_f64(f64::NAN)))
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::NonFiniteNumber {
                value: "NaN".to_string(),
                path: "ratio".to_string()
            }
        );
    }

    #[test]
    fn test_ror2_structures() {
        let out = ror2(|w| {
            w.write_map(|fields| {
                fields.entry("a", |w| w.write_string("x y"))?;
                fields.entry("b", |w| {
                    w.write_array(|items| {
                        items.item().write_i32(1)?;
                        items.item().write_string("")
                    })
                })
            })
        });
        assert_eq!(out, "(a:x%20y,b:List(1,''))");
    }

    #[test]
    fn test_bytes_use_code_points() {
        let empty = PathSpec::empty();
        assert_eq!(
            json(&empty, |w| w.write_bytes(&[0x41, 0xff])),
            "\"A\u{ff}\""
        );
    }

    #[test]
    fn test_compact_writer_reports_size_before_finish() {
        let mut writer = CompactJsonWriter::new();
        writer
            .writer()
            .write_map(|fields| fields.entry("k", |w| w.write_bool(false)))
            .unwrap();
        assert_eq!(writer.size(), r#"{"k":false}"#.len());
        assert_eq!(&writer.finish()[..], br#"{"k":false}"#);
    }
}
