//! Request targets.

/// The base URL an API's paths are relative to.
pub trait Target: Send + Sync {
    /// Name of the API, for logs.
    fn name(&self) -> &str;

    /// Base URL.
    fn url(&self) -> &str;
}

/// A target with a fixed name and URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardCodedTarget {
    name: String,
    url: String,
}

impl HardCodedTarget {
    /// Create a target.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// A target named after its URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: url.clone(),
            url,
        }
    }
}

impl Target for HardCodedTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }
}
