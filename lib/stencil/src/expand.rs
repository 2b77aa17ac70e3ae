//! Aggregate expansion.
//!
//! Arguments flagged in [`CallMetadata::index_to_expand`](crate::CallMetadata::index_to_expand)
//! are replaced in place by their field values, so that every later position
//! lookup (names, body, maps) sees one slot per field.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::{FieldOrder, Value};

/// Replace each flagged record by its field values, in descriptor order.
///
/// Expansion is one level deep: a record nested inside a field stays a
/// record. Null at a flagged position passes through as a single slot, as do
/// values that are not records. Without flagged positions the input is
/// returned as is.
#[must_use]
pub fn expand_arguments<'a>(
    argv: &'a [Value],
    index_to_expand: &BTreeMap<usize, FieldOrder>,
) -> Cow<'a, [Value]> {
    if index_to_expand.is_empty() {
        return Cow::Borrowed(argv);
    }

    let capacity = argv.len() + index_to_expand.values().map(FieldOrder::len).sum::<usize>();
    let mut expanded = Vec::with_capacity(capacity);
    for (index, value) in argv.iter().enumerate() {
        match (index_to_expand.get(&index), value) {
            (Some(order), Value::Record(record)) => expanded.extend(record.values_in(order)),
            _ => expanded.push(value.clone()),
        }
    }
    Cow::Owned(expanded)
}
