//! Rest.li protocol 2.0 URI encoding ("ROR2").
//!
//! Entity keys in resource paths, query parameter values and the
//! `X-RestLi-Id` header use a compact textual form:
//!
//! | Value | Encoding |
//! |---|---|
//! | string / number / boolean | percent-encoded text |
//! | empty string | `''` |
//! | map | `(k1:v1,k2:v2)` |
//! | array | `List(v1,v2)` |
//!
//! Every byte outside `[A-Za-z0-9-._~]` is percent-encoded, so the structural
//! characters `(),:'` never appear inside a scalar. The parser splits on
//! structure first and percent-decodes each token afterwards.

use serde_json::{Map, Value};

use crate::codec::errors::DecodeError;

pub(crate) const EMPTY_STRING: &str = "''";
pub(crate) const LIST_PREFIX: &str = "List(";

/// Percent-encodes a scalar for use inside a ROR2 value.
#[must_use]
pub fn escape(value: &str) -> String {
    if value.is_empty() {
        EMPTY_STRING.to_string()
    } else {
        urlencoding::encode(value).into_owned()
    }
}

/// Parses ROR2 text into the tree value model.
///
/// Scalars always come back as [`Value::String`]; readers in ROR2 mode parse
/// numbers and booleans out of them on demand.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedRor2`] on unbalanced parentheses, a missing
/// `:` in a map entry, trailing input, or invalid percent-encoding.
pub fn parse(input: &str) -> Result<Value, DecodeError> {
    let mut parser = Parser {
        input: input.as_bytes(),
        text: input,
        pos: 0,
    };
    let value = parser.value()?;
    if parser.pos != parser.input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> DecodeError {
        DecodeError::MalformedRor2 {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), DecodeError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", char::from(byte))))
        }
    }

    fn value(&mut self) -> Result<Value, DecodeError> {
        if self.text[self.pos..].starts_with(LIST_PREFIX) {
            self.pos += LIST_PREFIX.len();
            return self.list();
        }
        if self.peek() == Some(b'(') {
            self.pos += 1;
            return self.map();
        }
        self.scalar().map(Value::String)
    }

    fn list(&mut self) -> Result<Value, DecodeError> {
        let mut items = Vec::new();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.value()?);
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                _ => return Err(self.error("expected ',' or ')' in list")),
            }
        }
    }

    fn map(&mut self) -> Result<Value, DecodeError> {
        let mut entries = Map::new();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(Value::Object(entries));
        }
        loop {
            let key = self.scalar()?;
            self.expect(b':')?;
            let value = self.value()?;
            entries.insert(key, value);
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Value::Object(entries));
                }
                _ => return Err(self.error("expected ',' or ')' in map")),
            }
        }
    }

    fn scalar(&mut self) -> Result<String, DecodeError> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if matches!(byte, b'(' | b')' | b',' | b':') {
                break;
            }
            self.pos += 1;
        }
        let raw = &self.text[start..self.pos];
        if raw == EMPTY_STRING {
            return Ok(String::new());
        }
        if raw.is_empty() {
            return Err(self.error("expected a value"));
        }
        urlencoding::decode(raw)
            .map(std::borrow::Cow::into_owned)
            .map_err(|_| DecodeError::MalformedRor2 {
                offset: start,
                message: "invalid percent-encoding".to_string(),
            })
    }
}
