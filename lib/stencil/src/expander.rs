//! Default expanders.

use crate::{Error, Expander, Result, Value};

/// Expands a cookie parameter.
///
/// Accepts a string, taken as the cookie value, or a [`Cookie`](crate::Cookie)
/// whose name matches the parameter's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieExpander {
    name: String,
}

impl CookieExpander {
    /// Create an expander for the cookie called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name of the expected cookie.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Expander for CookieExpander {
    fn expand(&self, value: &Value) -> Result<String> {
        match value {
            Value::Str(value) => Ok(value.clone()),
            Value::Cookie(cookie) if cookie.name() == self.name => Ok(cookie.value().to_string()),
            Value::Cookie(cookie) => Err(Error::invalid_argument(format!(
                "cookie name '{}' does not match expected name '{}'",
                cookie.name(),
                self.name
            ))),
            other => Err(Error::invalid_argument(format!(
                "cookie '{}' must be a string or a cookie, got a {} value",
                self.name,
                other.kind()
            ))),
        }
    }
}

/// Expands any value to its display form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToStringExpander;

impl Expander for ToStringExpander {
    fn expand(&self, value: &Value) -> Result<String> {
        Ok(value.to_string())
    }
}
