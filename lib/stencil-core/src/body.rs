//! Body payload descriptions.

use std::borrow::Cow;

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of the payload handed to an [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BodyType {
    /// No declared type.
    #[default]
    Any,
    /// A named type, as declared by the API method.
    Named(Cow<'static, str>),
    /// String-keyed map of form parameters.
    FormMap,
    /// The whole argument vector, as a list.
    Arguments,
}

impl BodyType {
    /// Body type named after a Rust type.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::Named(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// Body type with an explicit name.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }
}
