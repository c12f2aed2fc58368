//! The error payload a rest.li server returns alongside the
//! `X-RestLi-Error-Response` header.

use serde_json::Value;
use thiserror::Error;

use crate::codec::{DecodeError, EncodeError, Marshaler, Reader, Unmarshaler, Writer};

/// A server-signaled application error.
///
/// Every field except `status` is optional on the wire. When the payload
/// cannot be decoded, the client still produces a `RestLiError` whose
/// `status` is the HTTP status and whose `message` is the raw body text.
///
/// # Example
///
/// ```rust
/// use restli_client::RestLiError;
///
/// let error = RestLiError {
///     status: 404,
///     message: Some("Widget 7 not found".to_string()),
///     ..RestLiError::default()
/// };
/// assert_eq!(error.to_string(), "rest.li error 404: Widget 7 not found");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Error)]
#[error("rest.li error {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
pub struct RestLiError {
    /// HTTP status the server associated with the error.
    pub status: i32,
    /// Human readable description.
    pub message: Option<String>,
    /// Numeric, service-specific error code.
    pub service_error_code: Option<i32>,
    /// Symbolic error code.
    pub code: Option<String>,
    /// Server-side exception class name.
    pub exception_class: Option<String>,
    /// Server-side stack trace.
    pub stack_trace: Option<String>,
    /// Link to documentation about the error.
    pub doc_url: Option<String>,
    /// Identifier of the failed request, for support tickets.
    pub request_id: Option<String>,
    /// Schema name of `error_details`.
    pub error_detail_type: Option<String>,
    /// Structured details of unknown schema.
    pub error_details: Option<Value>,
}

const STATUS: &str = "status";
const MESSAGE: &str = "message";
const SERVICE_ERROR_CODE: &str = "serviceErrorCode";
const CODE: &str = "code";
const EXCEPTION_CLASS: &str = "exceptionClass";
const STACK_TRACE: &str = "stackTrace";
const DOC_URL: &str = "docUrl";
const REQUEST_ID: &str = "requestId";
const ERROR_DETAIL_TYPE: &str = "errorDetailType";
const ERROR_DETAILS: &str = "errorDetails";

impl Unmarshaler for RestLiError {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut error = Self::default();
        reader.read_record(&[STATUS], |reader, field| {
            match field {
                STATUS => error.status = reader.read_i32()?,
                MESSAGE => error.message = Some(reader.read_string()?),
                SERVICE_ERROR_CODE => error.service_error_code = Some(reader.read_i32()?),
                CODE => error.code = Some(reader.read_string()?),
                EXCEPTION_CLASS => error.exception_class = Some(reader.read_string()?),
                STACK_TRACE => error.stack_trace = Some(reader.read_string()?),
                DOC_URL => error.doc_url = Some(reader.read_string()?),
                REQUEST_ID => error.request_id = Some(reader.read_string()?),
                ERROR_DETAIL_TYPE => error.error_detail_type = Some(reader.read_string()?),
                ERROR_DETAILS => error.error_details = Some(reader.read_raw()),
                _ => reader.skip()?,
            }
            Ok(())
        })?;
        Ok(error)
    }
}

impl Marshaler for RestLiError {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        writer.write_map(|fields| {
            fields.entry(STATUS, |w| w.write_i32(self.status))?;
            fields.optional(MESSAGE, self.message.as_deref(), |w, v| w.write_string(v))?;
            fields.optional(SERVICE_ERROR_CODE, self.service_error_code, |w, v| w.write_i32(v))?;
            fields.optional(CODE, self.code.as_deref(), |w, v| w.write_string(v))?;
            fields.optional(EXCEPTION_CLASS, self.exception_class.as_deref(), |w, v| {
                w.write_string(v)
            })?;
            fields.optional(STACK_TRACE, self.stack_trace.as_deref(), |w, v| w.write_string(v))?;
            fields.optional(DOC_URL, self.doc_url.as_deref(), |w, v| w.write_string(v))?;
            fields.optional(REQUEST_ID, self.request_id.as_deref(), |w, v| w.write_string(v))?;
            fields.optional(ERROR_DETAIL_TYPE, self.error_detail_type.as_deref(), |w, v| {
                w.write_string(v)
            })?;
            fields.optional(ERROR_DETAILS, self.error_details.as_ref(), |w, v| w.write_raw(v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{marshal_json, unmarshal_json, Decoded, PathSpec};

    #[test]
    fn test_decodes_full_payload() {
        let body = br#"{
            "status": 409,
            "message": "Widget already exists",
            "serviceErrorCode": 12,
            "code": "CONFLICT",
            "exceptionClass": "com.example.WidgetConflict",
            "stackTrace": "at ...",
            "docUrl": "https://docs.example.com/errors/12",
            "requestId": "req-1",
            "errorDetailType": "com.example.ConflictDetails",
            "errorDetails": {"existingId": 7},
            "futureField": true
        }"#;

        let decoded: Decoded<RestLiError> = unmarshal_json(body).unwrap();
        assert!(decoded.is_complete());

        let error = decoded.value;
        assert_eq!(error.status, 409);
        assert_eq!(error.message.as_deref(), Some("Widget already exists"));
        assert_eq!(error.service_error_code, Some(12));
        assert_eq!(error.code.as_deref(), Some("CONFLICT"));
        assert_eq!(error.request_id.as_deref(), Some("req-1"));
        assert_eq!(error.error_details, Some(serde_json::json!({"existingId": 7})));
    }

    #[test]
    fn test_missing_status_is_reported() {
        let decoded: Decoded<RestLiError> = unmarshal_json(br#"{"message": "boom"}"#).unwrap();
        assert_eq!(decoded.missing_fields, vec!["status"]);
        assert_eq!(decoded.value.message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_round_trip() {
        let error = RestLiError {
            status: 400,
            message: Some("bad".to_string()),
            error_details: Some(serde_json::json!([1, 2])),
            ..RestLiError::default()
        };
        let data = marshal_json(&error, PathSpec::empty()).unwrap();
        assert_eq!(&data[..], br#"{"status":400,"message":"bad","errorDetails":[1,2]}"#);

        let decoded: Decoded<RestLiError> = unmarshal_json(&data).unwrap();
        assert_eq!(decoded.value, error);
    }

    #[test]
    fn test_display_without_message() {
        let error = RestLiError {
            status: 500,
            ..RestLiError::default()
        };
        assert_eq!(error.to_string(), "rest.li error 500: <no message>");
    }
}
