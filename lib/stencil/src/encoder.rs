//! Default encoders.
//!
//! - [`JsonEncoder`] - any payload as a JSON body
//! - [`FormEncoder`] - form parameter maps as `application/x-www-form-urlencoded`,
//!   everything else through a delegate
//! - [`FieldQueryMapEncoder`] - records and maps as query/header pairs

use crate::{BodyType, ContentType, Encoder, Error, QueryMapEncoder, RequestTemplate, Result, Value};

const CONTENT_TYPE: &str = "Content-Type";

/// Encodes the payload as a JSON body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode(
        &self,
        payload: &Value,
        _body_type: &BodyType,
        template: &mut RequestTemplate,
    ) -> Result<()> {
        let body = serde_json::to_vec(payload)?;
        template.set_header(CONTENT_TYPE, ContentType::Json.as_str());
        template.set_body(body);
        Ok(())
    }
}

/// Encodes form parameter maps as an URL-encoded body.
///
/// Payloads of any other [`BodyType`] are handed to the delegate.
#[derive(Debug, Clone, Default)]
pub struct FormEncoder<E = JsonEncoder> {
    delegate: E,
}

impl<E: Encoder> FormEncoder<E> {
    /// Create a form encoder falling back to `delegate`.
    pub const fn new(delegate: E) -> Self {
        Self { delegate }
    }
}

impl<E: Encoder> Encoder for FormEncoder<E> {
    fn encode(
        &self,
        payload: &Value,
        body_type: &BodyType,
        template: &mut RequestTemplate,
    ) -> Result<()> {
        if *body_type != BodyType::FormMap {
            return self.delegate.encode(payload, body_type, template);
        }
        let body = serde_html_form::to_string(payload)?;
        template.set_header(CONTENT_TYPE, ContentType::FormUrlEncoded.as_str());
        template.set_body(body);
        Ok(())
    }
}

/// Reflects records into their non-null fields.
///
/// Maps are used as they are and null becomes an empty map. Any other value
/// has no fields and is an encoding error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldQueryMapEncoder;

impl QueryMapEncoder for FieldQueryMapEncoder {
    fn encode(&self, value: &Value) -> Result<Vec<(String, Value)>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Map(entries) => Ok(entries.clone()),
            Value::Record(record) => Ok(record
                .fields()
                .filter(|(_, value)| !value.is_null())
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect()),
            other => Err(Error::encode(format!(
                "cannot read fields of a {} value",
                other.kind()
            ))),
        }
    }
}
