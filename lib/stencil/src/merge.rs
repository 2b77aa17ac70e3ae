//! Query map and header map merging.
//!
//! Both run on an already resolved template and override entries with the
//! same name. They differ on purpose:
//!
//! | | query map | header map |
//! |---|---|---|
//! | names and values | percent-encoded | verbatim |
//! | null values | dropped | kept as `None` |
//! | no values left | entry left untouched | entry replaced |

use std::borrow::Cow;

use tracing::trace;

use crate::encoding::encode_query_component;
use crate::{QueryMapEncoder, RequestTemplate, Result, Value};

/// Override query parameters with the entries of a map argument.
///
/// A [`Value::Map`] is used directly; anything else goes through `encoder`.
pub fn merge_query_map(
    template: &mut RequestTemplate,
    value: &Value,
    encoder: &dyn QueryMapEncoder,
) -> Result<()> {
    for (name, value) in entries(value, encoder)?.iter() {
        let values: Vec<String> = values_of(value)
            .into_iter()
            .flatten()
            .map(|value| encode_query_component(&value))
            .collect();
        if values.is_empty() {
            continue;
        }
        trace!(name = %name, count = values.len(), "query map override");
        template
            .queries_mut()
            .replace(encode_query_component(name), values);
    }
    Ok(())
}

/// Override headers with the entries of a map argument.
///
/// A [`Value::Map`] is used directly; anything else goes through `encoder`.
pub fn merge_header_map(
    template: &mut RequestTemplate,
    value: &Value,
    encoder: &dyn QueryMapEncoder,
) -> Result<()> {
    for (name, value) in entries(value, encoder)?.iter() {
        let values = values_of(value);
        trace!(name = %name, count = values.len(), "header map override");
        template.headers_mut().replace(name.clone(), values);
    }
    Ok(())
}

fn entries<'a>(
    value: &'a Value,
    encoder: &dyn QueryMapEncoder,
) -> Result<Cow<'a, [(String, Value)]>> {
    match value {
        Value::Map(entries) => Ok(Cow::Borrowed(entries)),
        other => encoder.encode(other).map(Cow::Owned),
    }
}

/// String forms of a map entry; lists contribute one value per element.
fn values_of(value: &Value) -> Vec<Option<String>> {
    match value {
        Value::List(items) => items.iter().map(string_of).collect(),
        other => vec![string_of(other)],
    }
}

fn string_of(value: &Value) -> Option<String> {
    (!value.is_null()).then(|| value.to_string())
}
