//! Percent-encoding of URI components.

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped in a path segment.
///
/// Unreserved characters and sub-delimiters are kept, anything that would
/// change the structure of the path (`/`, `?`, `#`, braces, `%`) is escaped.
pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// Characters escaped in a query name or value: everything but unreserved.
pub const QUERY_COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a path segment value.
#[must_use]
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET).to_string()
}

/// Percent-encode a query parameter name or value.
#[must_use]
pub fn encode_query_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn path_segment_escapes_structure() {
        check!(encode_path_segment("a b/c?d") == "a%20b%2Fc%3Fd");
        check!(encode_path_segment("user-1_x.y~z") == "user-1_x.y~z");
        check!(encode_path_segment("50%") == "50%25");
    }

    #[test]
    fn query_component_keeps_only_unreserved() {
        check!(encode_query_component("a b&c=d") == "a%20b%26c%3Dd");
        check!(encode_query_component("x,y") == "x%2Cy");
        check!(encode_query_component("caf\u{e9}") == "caf%C3%A9");
    }
}
