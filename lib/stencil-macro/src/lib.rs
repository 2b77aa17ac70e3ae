//! Procedural macros for the stencil request template engine.
//!
//! - `#[derive(Aggregate)]` - Declare the field order of a structural aggregate

mod aggregate_derive;

use proc_macro::TokenStream;

/// Derive the `Aggregate` trait for a struct.
///
/// The derived field order is the declaration order, which is the order
/// expansion uses to lay the fields out as separate arguments. A
/// `From<T> for Value` conversion producing a `Value::Record` is derived too.
///
/// # Struct Attributes
///
/// - `#[aggregate(rename_all = "camelCase")]` - Rename all fields using a case convention
/// - `#[aggregate(type_name = "Name")]` - Type name kept on the record
///
/// Supported case conventions: `lowercase`, `UPPERCASE`, `camelCase`,
/// `PascalCase`, `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case`.
///
/// # Field Attributes
///
/// - `#[aggregate(rename = "name")]` - Use a different field name (overrides `rename_all`)
/// - `#[aggregate(skip)]` - Leave the field out
///
/// # Example
///
/// ```ignore
/// use stencil::Aggregate;
///
/// #[derive(Aggregate)]
/// #[aggregate(rename_all = "camelCase")]
/// struct Page {
///     page_number: u32,   // "pageNumber"
///     page_size: u32,     // "pageSize"
/// }
/// ```
#[proc_macro_derive(Aggregate, attributes(aggregate))]
pub fn derive_aggregate(input: TokenStream) -> TokenStream {
    aggregate_derive::expand_aggregate_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
