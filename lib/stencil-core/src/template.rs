//! Request templates.
//!
//! A [`RequestTemplate`] is first built as the blueprint of a call (method,
//! path with `{name}` placeholders, static query parameters and headers),
//! then copied once per call, filled by encoders and resolved against the
//! bound [`Variables`].
//!
//! # Example
//!
//! ```
//! use stencil_core::{Method, RequestTemplate, Variables};
//!
//! let blueprint = RequestTemplate::new(Method::Get, "/users/{id}?fields={fields}")
//!     .header("Accept", "application/json");
//!
//! let variables: Variables = [("id", "42"), ("fields", "name,email")].into_iter().collect();
//! let resolved = blueprint.clone().resolve(&variables).expect("all variables bound");
//!
//! assert_eq!(resolved.url(), "/users/42?fields=name%2Cemail");
//! ```

use std::collections::BTreeSet;
use std::fmt;

use bytes::Bytes;

use crate::encoding::{encode_path_segment, encode_query_component};
use crate::{Error, Method, Multimap, Request, Result, Value, Variables};

/// In-progress representation of one outgoing HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestTemplate {
    method: Method,
    target: Option<String>,
    path: String,
    queries: Multimap<String>,
    headers: Multimap<Option<String>>,
    body: Option<Bytes>,
    body_template: Option<String>,
    already_encoded: BTreeSet<String>,
    resolved: bool,
}

impl RequestTemplate {
    /// Create a blueprint from a method and a URI template.
    ///
    /// Anything after the first `?` is split into query parameters, so
    /// `/search?q={q}&page=1` binds `q` and `page` in the query multimap.
    #[must_use]
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        let mut queries = Multimap::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            match pair.split_once('=') {
                Some((name, value)) => queries.append(name, [value.to_string()]),
                None => queries.append(pair, []),
            }
        }

        Self {
            method,
            path: path.to_string(),
            queries,
            headers: Multimap::case_insensitive(),
            ..Self::default()
        }
    }

    /// Parse a blueprint from a `"VERB /path"` request line.
    pub fn parse(request_line: &str) -> Result<Self> {
        let (method, uri) = request_line
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "expected \"VERB /path\", got \"{request_line}\""
                ))
            })?;
        Ok(Self::new(method.parse()?, uri.trim()))
    }

    /// Add a query parameter value (may contain placeholders).
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.queries.append(name, [value.into()]);
        self
    }

    /// Add a header value (may contain placeholders).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, [Some(value.into())]);
        self
    }

    /// Set a body template, expanded without percent-encoding on resolution.
    ///
    /// Braces that belong to the body itself are written `%7B` and `%7D`,
    /// e.g. `%7B"user": "{user}"%7D`.
    #[must_use]
    pub fn body_template(mut self, template: impl Into<String>) -> Self {
        self.body_template = Some(template.into());
        self
    }

    /// Set the target URL the path is relative to.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Target URL, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Path (a pattern until resolved).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query multimap.
    #[must_use]
    pub const fn queries(&self) -> &Multimap<String> {
        &self.queries
    }

    /// Mutable query multimap.
    pub const fn queries_mut(&mut self) -> &mut Multimap<String> {
        &mut self.queries
    }

    /// Values of one query parameter.
    #[must_use]
    pub fn query_values(&self, name: &str) -> Option<&[String]> {
        self.queries.get(name)
    }

    /// Header multimap; keys compare ignoring case.
    #[must_use]
    pub const fn headers(&self) -> &Multimap<Option<String>> {
        &self.headers
    }

    /// Mutable header multimap.
    pub const fn headers_mut(&mut self) -> &mut Multimap<Option<String>> {
        &mut self.headers
    }

    /// Values of one header.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Option<&[Option<String>]> {
        self.headers.get(name)
    }

    /// Encoded body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Body template, if any.
    #[must_use]
    pub fn body_template_str(&self) -> Option<&str> {
        self.body_template.as_deref()
    }

    /// Names of the variables that bypass percent-encoding.
    pub fn already_encoded(&self) -> impl Iterator<Item = &str> {
        self.already_encoded.iter().map(String::as_str)
    }

    /// Returns `true` once [`RequestTemplate::resolve`] succeeded.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    // ------------------------------------------------------------------------
    // Mutation (used by the engine and by encoders)
    // ------------------------------------------------------------------------

    /// Override the target URL.
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = Some(target.into());
    }

    /// Set the encoded body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Some(body.into());
    }

    /// Override a header with a single value.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.replace(name, [Some(value.into())]);
    }

    /// Mark variables whose values are already percent-encoded.
    pub fn mark_already_encoded<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.already_encoded.extend(names.into_iter().map(Into::into));
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Substitute every placeholder with the bound variables.
    ///
    /// - path values are percent-encoded as path segments, query values as
    ///   query components, header and body-template values are used verbatim;
    /// - variables marked already-encoded are never escaped;
    /// - a query or header value that is a single placeholder bound to a
    ///   list expands to one value per non-null element;
    /// - a query or header value whose placeholder is bound to null is
    ///   dropped, and so is the parameter once it has no value left;
    /// - an unbound placeholder, or a null one in the path, is a
    ///   [`Error::MissingVariable`].
    pub fn resolve(mut self, variables: &Variables) -> Result<Self> {
        let encoded = &self.already_encoded;

        self.path = expand_path(&self.path, variables, encoded)?;

        let mut queries = Multimap::new();
        for (name, values) in std::mem::take(&mut self.queries) {
            if values.is_empty() {
                queries.append(name, []);
                continue;
            }
            let mut expanded = Vec::new();
            for value in &values {
                expanded.extend(expand_value(value, variables, |name, raw| {
                    if encoded.contains(name) {
                        raw.to_string()
                    } else {
                        encode_query_component(raw)
                    }
                })?);
            }
            if !expanded.is_empty() {
                queries.append(name, expanded);
            }
        }
        self.queries = queries;

        let mut headers = Multimap::case_insensitive();
        for (name, values) in std::mem::take(&mut self.headers) {
            let mut expanded = Vec::new();
            for value in values {
                match value {
                    Some(value) => expanded.extend(
                        expand_value(&value, variables, |_, raw| raw.to_string())?
                            .into_iter()
                            .map(Some),
                    ),
                    None => expanded.push(None),
                }
            }
            if !expanded.is_empty() {
                headers.append(name, expanded);
            }
        }
        self.headers = headers;

        if let Some(template) = &self.body_template {
            self.body = Some(Bytes::from(expand_body(template, variables)?));
        }

        self.resolved = true;
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Query string, without the leading `?`.
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut pairs = Vec::new();
        for (name, values) in self.queries.iter() {
            if values.is_empty() {
                pairs.push(name.to_string());
            }
            for value in values {
                pairs.push(format!("{name}={value}"));
            }
        }
        pairs.join("&")
    }

    /// Target, path and query string.
    #[must_use]
    pub fn url(&self) -> String {
        let mut url = String::new();
        if let Some(target) = &self.target {
            url.push_str(target.trim_end_matches('/'));
        }
        url.push_str(&self.path);
        let query = self.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Build the transport request from a resolved template.
    ///
    /// Null header values are left out.
    pub fn to_request(&self) -> Result<Request> {
        if !self.resolved {
            return Err(Error::invalid_argument(
                "request template must be resolved before it is sent",
            ));
        }
        let url = url::Url::parse(&self.url())?;
        let headers = self
            .headers
            .iter()
            .flat_map(|(name, values)| {
                values
                    .iter()
                    .flatten()
                    .map(move |value| (name.to_string(), value.clone()))
            })
            .collect();
        Ok(Request::new(self.method, url, headers, self.body.clone()))
    }
}

impl fmt::Display for RequestTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url())
    }
}

// ============================================================================
// Placeholder expansion
// ============================================================================

/// Render a bound value as text; `None` for null (or a list of nulls).
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::List(items) => {
            let rendered: Vec<_> = items.iter().filter_map(render).collect();
            (!rendered.is_empty()).then(|| rendered.join(","))
        }
        other => Some(other.to_string()),
    }
}

/// Expand `{name}` expressions of `template`.
///
/// `lookup` returns the replacement text, or `None` to drop the whole
/// expansion. A `{` without a closing `}` is kept as literal text, and
/// `{name:pattern}` binds `name`.
fn expand_expressions(
    template: &str,
    lookup: impl FnMut(&str) -> Result<Option<String>>,
) -> Result<Option<String>> {
    expand_with_literals(template, lookup, |out, literal| out.push_str(literal))
}

/// Expand a body template; literal braces are written `%7B` and `%7D`.
fn expand_body(template: &str, variables: &Variables) -> Result<String> {
    let body = expand_with_literals(
        template,
        |name| {
            let value = variables
                .get(name)
                .ok_or_else(|| Error::missing_variable(name))?;
            Ok(Some(render(value).unwrap_or_default()))
        },
        |out, literal| out.push_str(&literal.replace("%7B", "{").replace("%7D", "}")),
    )?;
    // the body lookup never drops an expansion
    Ok(body.unwrap_or_default())
}

fn expand_with_literals(
    template: &str,
    mut lookup: impl FnMut(&str) -> Result<Option<String>>,
    push_literal: impl Fn(&mut String, &str),
) -> Result<Option<String>> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((literal, after)) = rest.split_once('{') {
        let Some((expression, tail)) = after.split_once('}') else {
            break;
        };
        push_literal(&mut out, literal);
        let name = expression
            .split_once(':')
            .map_or(expression, |(name, _)| name)
            .trim();
        match lookup(name)? {
            Some(text) => out.push_str(&text),
            None => return Ok(None),
        }
        rest = tail;
    }
    push_literal(&mut out, rest);
    Ok(Some(out))
}

/// The placeholder name if `template` is exactly one expression.
fn single_expression(template: &str) -> Option<&str> {
    let inner = template.strip_prefix('{')?.strip_suffix('}')?;
    if inner.contains(['{', '}']) {
        return None;
    }
    Some(inner.split_once(':').map_or(inner, |(name, _)| name).trim())
}

fn expand_path(path: &str, variables: &Variables, encoded: &BTreeSet<String>) -> Result<String> {
    let expanded = expand_expressions(path, |name| {
        let value = variables
            .get(name)
            .ok_or_else(|| Error::missing_variable(name))?;
        let raw = render(value).ok_or_else(|| Error::missing_variable(name))?;
        Ok(Some(if encoded.contains(name) {
            raw
        } else {
            encode_path_segment(&raw)
        }))
    })?;
    // the path lookup never drops an expansion
    Ok(expanded.unwrap_or_default())
}

/// Expand one query or header value into zero or more values.
fn expand_value(
    template: &str,
    variables: &Variables,
    encode: impl Fn(&str, &str) -> String,
) -> Result<Vec<String>> {
    if let Some(name) = single_expression(template) {
        let value = variables
            .get(name)
            .ok_or_else(|| Error::missing_variable(name))?;
        return Ok(match value {
            Value::List(items) => items
                .iter()
                .filter_map(render)
                .map(|raw| encode(name, &raw))
                .collect(),
            other => render(other)
                .map(|raw| encode(name, &raw))
                .into_iter()
                .collect(),
        });
    }

    let expanded = expand_expressions(template, |name| {
        let value = variables
            .get(name)
            .ok_or_else(|| Error::missing_variable(name))?;
        Ok(render(value).map(|raw| encode(name, &raw)))
    })?;
    Ok(expanded.into_iter().collect())
}
