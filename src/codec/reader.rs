//! Readers over the decoded value tree.
//!
//! A [`Reader`] is scoped to one value. Maps are visited key by key; the
//! visitor either reads the value or calls [`Reader::skip`], so unknown keys
//! never fail a decode. Required-field bookkeeping is done by
//! [`Reader::read_record`], which records absent fields in the decode session
//! instead of failing: the caller decides afterwards whether missing fields
//! are fatal.

use serde_json::Value;

use crate::codec::errors::DecodeError;
use crate::codec::writer::{join_path, Encoding};

/// Reads a single value of the tree.
#[derive(Debug)]
pub struct Reader<'a> {
    value: &'a Value,
    encoding: Encoding,
    path: String,
    missing: &'a mut Vec<String>,
}

impl<'a> Reader<'a> {
    /// Creates a reader over `value`.
    ///
    /// `encoding` tells the reader how scalars are represented: in
    /// [`Encoding::Ror2`] every scalar is a string and numbers/booleans are
    /// parsed out of it. Missing required fields are appended to `missing`.
    #[must_use]
    pub fn new(value: &'a Value, encoding: Encoding, missing: &'a mut Vec<String>) -> Self {
        Self {
            value,
            encoding,
            path: String::new(),
            missing,
        }
    }

    /// Dotted path of this value relative to the root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns `true` if the value is JSON `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn child(&mut self, value: &'a Value, segment: &str) -> Reader<'_> {
        Reader {
            value,
            encoding: self.encoding,
            path: join_path(&self.path, segment),
            missing: &mut *self.missing,
        }
    }

    fn unexpected(&self, expected: &'static str) -> DecodeError {
        DecodeError::UnexpectedType {
            path: self.path.clone(),
            expected,
            found: type_name(self.value),
        }
    }

    fn invalid_number(&self, expected: &'static str, value: impl ToString) -> DecodeError {
        DecodeError::InvalidNumber {
            path: self.path.clone(),
            expected,
            value: value.to_string(),
        }
    }

    /// Builds a [`DecodeError::Custom`] located at this value.
    #[must_use]
    pub fn error(&self, message: impl ToString) -> DecodeError {
        DecodeError::Custom {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    /// Builds a [`DecodeError::UnknownSymbol`] located at this value.
    #[must_use]
    pub fn unknown_symbol(&self, symbol: &str) -> DecodeError {
        DecodeError::UnknownSymbol {
            path: self.path.clone(),
            symbol: symbol.to_string(),
        }
    }

    fn visit_entries<F>(&mut self, mut visit: F) -> Result<(), DecodeError>
    where
        F: FnMut(Reader<'_>, &str) -> Result<(), DecodeError>,
    {
        let value: &'a Value = self.value;
        let Value::Object(entries) = value else {
            return Err(self.unexpected("map"));
        };
        for (key, value) in entries {
            visit(self.child(value, key), key)?;
        }
        Ok(())
    }

    /// Visits every key of a map.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedType`] if the value is not a map, or
    /// the first error returned by `visit`.
    pub fn read_map<F>(mut self, visit: F) -> Result<(), DecodeError>
    where
        F: FnMut(Reader<'_>, &str) -> Result<(), DecodeError>,
    {
        self.visit_entries(visit)
    }

    /// Visits every key of a record and records absent `required` fields.
    ///
    /// Missing fields are not an error here: they are appended to the decode
    /// session (see [`Decoded`]) and the visitor's partially populated value
    /// remains valid.
    ///
    /// # Errors
    ///
    /// Same as [`read_map`](Self::read_map).
    pub fn read_record<F>(mut self, required: &[&str], mut visit: F) -> Result<(), DecodeError>
    where
        F: FnMut(Reader<'_>, &str) -> Result<(), DecodeError>,
    {
        let mut seen = vec![false; required.len()];
        self.visit_entries(|reader, key| {
            if let Some(index) = required.iter().position(|field| *field == key) {
                seen[index] = true;
            }
            visit(reader, key)
        })?;

        for (field, seen) in required.iter().zip(seen) {
            if !seen {
                self.missing.push(join_path(&self.path, field));
            }
        }
        Ok(())
    }

    /// Visits every item of an array.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedType`] if the value is not an array, or
    /// the first error returned by `visit`.
    pub fn read_array<F>(mut self, mut visit: F) -> Result<(), DecodeError>
    where
        F: FnMut(Reader<'_>) -> Result<(), DecodeError>,
    {
        let value: &'a Value = self.value;
        let Value::Array(items) = value else {
            return Err(self.unexpected("array"));
        };
        for (index, item) in items.iter().enumerate() {
            visit(self.child(item, &index.to_string()))?;
        }
        Ok(())
    }

    /// Reads a string.
    pub fn read_string(self) -> Result<String, DecodeError> {
        match self.value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(self.unexpected("string")),
        }
    }

    /// Reads an enum symbol. Use [`unknown_symbol`](Self::unknown_symbol) to
    /// reject symbols the caller does not know.
    pub fn read_symbol(self) -> Result<String, DecodeError> {
        match self.value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(self.unexpected("enum")),
        }
    }

    /// Reads a boolean.
    pub fn read_bool(self) -> Result<bool, DecodeError> {
        match self.value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) if self.encoding == Encoding::Ror2 => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(self.unexpected("boolean")),
            },
            _ => Err(self.unexpected("boolean")),
        }
    }

    /// Reads a 64-bit integer.
    pub fn read_i64(self) -> Result<i64, DecodeError> {
        match self.value {
            Value::Number(n) => n.as_i64().ok_or_else(|| self.invalid_number("long", n)),
            Value::String(s) if self.encoding == Encoding::Ror2 => {
                s.parse().map_err(|_| self.invalid_number("long", s))
            }
            _ => Err(self.unexpected("long")),
        }
    }

    /// Reads a 32-bit integer.
    pub fn read_i32(self) -> Result<i32, DecodeError> {
        let path = self.path.clone();
        let value = self.read_i64().map_err(|e| match e {
            DecodeError::InvalidNumber { path, value, .. } => DecodeError::InvalidNumber {
                path,
                expected: "int",
                value,
            },
            DecodeError::UnexpectedType { path, found, .. } => DecodeError::UnexpectedType {
                path,
                expected: "int",
                found,
            },
            other => other,
        })?;
        i32::try_from(value).map_err(|_| DecodeError::InvalidNumber {
            path,
            expected: "int",
            value: value.to_string(),
        })
    }

    /// Reads a 64-bit float.
    pub fn read_f64(self) -> Result<f64, DecodeError> {
        match self.value {
            Value::Number(n) => n.as_f64().ok_or_else(|| self.invalid_number("double", n)),
            Value::String(s) if self.encoding == Encoding::Ror2 => s
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| self.invalid_number("double", s)),
            _ => Err(self.unexpected("double")),
        }
    }

    /// Reads a 32-bit float.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read_f32(self) -> Result<f32, DecodeError> {
        self.read_f64().map(|v| v as f32)
    }

    /// Reads rest.li `bytes` (a string whose code points are byte values).
    pub fn read_bytes(self) -> Result<Vec<u8>, DecodeError> {
        let Value::String(s) = self.value else {
            return Err(self.unexpected("bytes"));
        };
        s.chars()
            .map(|c| {
                u8::try_from(u32::from(c)).map_err(|_| DecodeError::InvalidBytes {
                    path: self.path.clone(),
                    code_point: u32::from(c),
                })
            })
            .collect()
    }

    /// Returns a copy of the raw value, for untyped data.
    #[must_use]
    pub fn read_raw(self) -> Value {
        self.value.clone()
    }

    /// Discards the value.
    #[allow(clippy::unnecessary_wraps)]
    pub fn skip(self) -> Result<(), DecodeError> {
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

/// Result of a decode: the value plus the required fields that were absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<V> {
    /// The decoded (possibly partial) value.
    pub value: V,
    /// Dotted paths of required fields that were not present.
    pub missing_fields: Vec<String>,
}

impl<V> Decoded<V> {
    /// Returns `true` if no required field was missing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }

    /// Treats missing required fields as an error.
    ///
    /// # Errors
    ///
    /// Returns [`MissingRequiredFieldsError`](crate::codec::MissingRequiredFieldsError)
    /// carrying the field list and the partial value.
    pub fn strict(self) -> Result<V, crate::codec::MissingRequiredFieldsError>
    where
        V: Send + Sync + 'static,
    {
        if self.missing_fields.is_empty() {
            Ok(self.value)
        } else {
            Err(
                crate::codec::MissingRequiredFieldsError::new(self.missing_fields)
                    .with_partial_value(self.value),
            )
        }
    }
}

/// Runs `unmarshal` over an already parsed tree.
///
/// # Errors
///
/// Returns the first [`DecodeError`] raised by `unmarshal`.
pub fn decode_tree<V, F>(tree: &Value, encoding: Encoding, unmarshal: F) -> Result<Decoded<V>, DecodeError>
where
    F: FnOnce(Reader<'_>) -> Result<V, DecodeError>,
{
    let mut missing_fields = Vec::new();
    let value = unmarshal(Reader::new(tree, encoding, &mut missing_fields))?;
    Ok(Decoded {
        value,
        missing_fields,
    })
}

/// Parses a JSON document into the tree value model.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedJson`] if `data` is not valid JSON.
pub fn parse_json(data: &[u8]) -> Result<Value, DecodeError> {
    serde_json::from_slice(data).map_err(|e| DecodeError::MalformedJson {
        message: e.to_string(),
    })
}
