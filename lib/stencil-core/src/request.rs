//! Transport handoff.
//!
//! A [`Request`] is what a resolved [`RequestTemplate`](crate::RequestTemplate)
//! turns into once its URL is absolute: the form a transport layer sends.

use bytes::Bytes;

use crate::{Error, Method, Result};

/// An HTTP request with method, absolute URL, headers, and optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl Request {
    /// Create a request.
    #[must_use]
    pub const fn new(
        method: Method,
        url: url::Url,
        headers: Vec<(String, String)>,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Headers, one entry per value.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of a header, ignoring name case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Convert into an [`http::Request`].
    pub fn into_http(self) -> Result<http::Request<Bytes>> {
        let mut builder = http::Request::builder()
            .method(http::Method::from(self.method))
            .uri(self.url.as_str());

        for (name, value) in &self.headers {
            let name = http::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
            let value = http::HeaderValue::from_str(value)
                .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
            builder = builder.header(name, value);
        }

        builder
            .body(self.body.unwrap_or_default())
            .map_err(|e| Error::invalid_argument(e.to_string()))
    }
}
