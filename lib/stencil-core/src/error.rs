//! Error types for stencil.

use std::fmt;

use derive_more::{Display, Error, From};

/// Boxed error used as the cause of an [`EncodeError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Encode Error
// ============================================================================

/// Failure while serializing a body, a form or a query map.
///
/// Carries a message and, when the failure was raised by something other
/// than an encoder, the original error as its [`source`](std::error::Error::source).
#[derive(Debug)]
pub struct EncodeError {
    message: String,
    cause: Option<BoxError>,
}

impl EncodeError {
    /// Create an encode error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create an encode error wrapping the error that caused it.
    #[must_use]
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for stencil operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A required collaborator was not provided when building a resolver.
    #[display("missing collaborator: {_0}")]
    #[from(skip)]
    Construction(#[error(not(source))] String),

    /// An argument is absent or has a shape the call cannot accept.
    #[display("invalid argument: {_0}")]
    #[from(skip)]
    InvalidArgument(#[error(not(source))] String),

    /// Body, form or query map serialization failed.
    #[display("encoding error: {_0}")]
    #[from]
    Encode(EncodeError),

    /// A template placeholder has no bound variable.
    #[display("missing variable '{_0}' in template")]
    #[from(skip)]
    MissingVariable(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// A header name or value is not valid on the wire.
    #[display("invalid header: {_0}")]
    #[from(skip)]
    InvalidHeader(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a construction error naming the missing collaborator.
    #[must_use]
    pub fn construction(collaborator: impl Into<String>) -> Self {
        Self::Construction(collaborator.into())
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an encoding error from a message.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(EncodeError::new(message))
    }

    /// Create a missing variable error.
    #[must_use]
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable(name.into())
    }

    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader(message.into())
    }

    /// Turn any error raised while encoding into an [`Error::Encode`].
    ///
    /// Encoding errors pass through unchanged; anything else is wrapped,
    /// keeping its message and the original error as the cause.
    #[must_use]
    pub fn into_encode(self) -> Self {
        match self {
            Self::Encode(_) => self,
            other => Self::Encode(EncodeError::with_cause(other.to_string(), other)),
        }
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if this is an encoding error.
    #[must_use]
    pub const fn is_encode(&self) -> bool {
        matches!(self, Self::Encode(_))
    }
}
