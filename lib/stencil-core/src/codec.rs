//! Collaborator traits used while resolving a call.
//!
//! - [`Encoder`] - serializes a body or form payload into the template
//! - [`QueryMapEncoder`] - turns a query/header map argument into key/value pairs
//! - [`Expander`] - converts one argument value to its wire string
//!
//! Implementations are chosen when the call metadata is built and stored on
//! it, so no dispatch on argument types happens per call.

use crate::{BodyType, RequestTemplate, Result, Value};

/// Serializes a payload into a [`RequestTemplate`].
///
/// The payload is either a [`Value::Map`] of form parameters
/// ([`BodyType::FormMap`]), the whole argument list as a [`Value::List`]
/// ([`BodyType::Arguments`]), or the body argument itself.
///
/// Failures should be reported as [`Error::Encode`](crate::Error::Encode);
/// any other error is wrapped into one by the caller.
pub trait Encoder: Send + Sync {
    /// Encode `payload` into `template`, usually setting its body and
    /// `Content-Type` header.
    fn encode(
        &self,
        payload: &Value,
        body_type: &BodyType,
        template: &mut RequestTemplate,
    ) -> Result<()>;
}

/// Reflects an object into query (or header) key/value pairs.
pub trait QueryMapEncoder: Send + Sync {
    /// Produce the pairs, in order.
    ///
    /// Fails with [`Error::Encode`](crate::Error::Encode) when the value
    /// cannot be seen as key/value pairs.
    fn encode(&self, value: &Value) -> Result<Vec<(String, Value)>>;
}

/// Converts a single argument value to its string form.
pub trait Expander: Send + Sync {
    /// Expand the value.
    ///
    /// Fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument)
    /// when the value is not of an accepted shape.
    fn expand(&self, value: &Value) -> Result<String>;
}

impl<F> Expander for F
where
    F: Fn(&Value) -> Result<String> + Send + Sync,
{
    fn expand(&self, value: &Value) -> Result<String> {
        self(value)
    }
}
