//! Aggregate derive macro implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Fields, parse2};

/// Struct-level options parsed from `#[aggregate(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct AggregateStructOptions {
    /// Rename all fields using the given case convention.
    rename_all: Option<RenameRule>,
    /// Type name kept on the produced record.
    type_name: Option<String>,
}

/// Field options parsed from `#[aggregate(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct AggregateFieldOptions {
    /// Leave the field out of the aggregate.
    skip: bool,
    /// Name of the field in the aggregate.
    rename: Option<String>,
}

/// Case conversion rules for `rename_all`.
#[derive(Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
enum RenameRule {
    LowerCase,
    UpperCase,
    CamelCase,
    PascalCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
}

impl RenameRule {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "lowercase" => Some(Self::LowerCase),
            "UPPERCASE" => Some(Self::UpperCase),
            "camelCase" => Some(Self::CamelCase),
            "PascalCase" => Some(Self::PascalCase),
            "snake_case" => Some(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            _ => None,
        }
    }

    /// Apply the rule to a `snake_case` field name.
    fn apply(self, name: &str) -> String {
        match self {
            Self::LowerCase => name.to_lowercase(),
            Self::UpperCase => name.to_uppercase(),
            Self::CamelCase => camel_case(name, false),
            Self::PascalCase => camel_case(name, true),
            Self::SnakeCase => name.to_string(),
            Self::ScreamingSnakeCase => name.to_uppercase(),
            Self::KebabCase => name.replace('_', "-"),
        }
    }
}

/// Join `snake_case` words into `camelCase` (or `PascalCase`).
fn camel_case(name: &str, capitalize_first: bool) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = capitalize_first;
    for c in name.chars() {
        if c == '_' {
            capitalize_next = !result.is_empty() || capitalize_first;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Expand the `#[derive(Aggregate)]` macro.
pub fn expand_aggregate_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let struct_options = parse_struct_options(&input.attrs)?;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Aggregate derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Aggregate derive only supports structs",
            ));
        }
    };

    let mut keys = Vec::new();
    let mut idents = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_field_options(&field.attrs)?;
        if options.skip {
            continue;
        }

        // explicit rename > rename_all > field name
        let field_name = ident.to_string();
        let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name);
        let key = match (options.rename, struct_options.rename_all) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => rule.apply(field_name),
            (None, None) => field_name.to_string(),
        };

        keys.push(key);
        idents.push(ident);
    }

    let type_name = struct_options
        .type_name
        .unwrap_or_else(|| name.to_string());

    Ok(quote! {
        impl #impl_generics ::stencil::Aggregate for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const FIELDS: &'static [&'static str] = &[#(#keys),*];

            fn into_values(self) -> ::std::vec::Vec<::stencil::Value> {
                ::std::vec![#(::core::convert::Into::<::stencil::Value>::into(self.#idents)),*]
            }
        }

        impl #impl_generics ::core::convert::From<#name #ty_generics> for ::stencil::Value #where_clause {
            fn from(value: #name #ty_generics) -> Self {
                ::stencil::Value::record(value)
            }
        }
    })
}

fn parse_struct_options(attrs: &[syn::Attribute]) -> syn::Result<AggregateStructOptions> {
    let mut options = AggregateStructOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("aggregate") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: syn::LitStr = meta.value()?.parse()?;
                let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &value,
                        format!(
                            "unknown rename_all value: \"{}\". Expected one of: \
                             lowercase, UPPERCASE, camelCase, PascalCase, \
                             snake_case, SCREAMING_SNAKE_CASE, kebab-case",
                            value.value()
                        ),
                    )
                })?;
                options.rename_all = Some(rule);
                Ok(())
            } else if meta.path.is_ident("type_name") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.type_name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported aggregate attribute"))
            }
        })?;
    }

    Ok(options)
}

fn parse_field_options(attrs: &[syn::Attribute]) -> syn::Result<AggregateFieldOptions> {
    let mut options = AggregateFieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("aggregate") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported aggregate field attribute"))
            }
        })?;
    }

    Ok(options)
}
