//! Request template engine for declarative HTTP clients.
//!
//! Given the static [`CallMetadata`] of an API method and the runtime
//! argument values of one call, stencil produces a fully resolved
//! [`RequestTemplate`]: method, URL path, query string, headers and encoded
//! body.
//!
//! - [`TemplateFactoryResolver`] - picks a [`Strategy`] once per method
//! - [`TemplateFactory`] - builds one template per call
//! - [`JsonEncoder`], [`FormEncoder`], [`FieldQueryMapEncoder`] - default encoders
//! - [`CookieExpander`], [`ToStringExpander`] - default expanders
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use stencil::prelude::*;
//!
//! #[derive(Aggregate)]
//! struct Page {
//!     number: u32,
//!     size: u32,
//! }
//!
//! let metadata = CallMetadata::builder(RequestTemplate::parse(
//!     "GET /repos/{owner}/issues?page={number}&per_page={size}",
//! )?)
//! .config_key("IssueApi#list")
//! .name(0, "owner")
//! .expand_aggregate::<Page>(1)
//! .name(1, "number")
//! .name(2, "size")
//! .build();
//!
//! let factory = TemplateFactoryResolver::with_defaults().resolve(
//!     Arc::new(HardCodedTarget::new("github", "https://api.github.com")),
//!     Arc::new(metadata),
//! );
//! let template = factory.create(&[
//!     Value::from("rust lang"),
//!     Value::from(Page { number: 2, size: 50 }),
//! ])?;
//!
//! assert_eq!(
//!     template.url(),
//!     "https://api.github.com/repos/rust%20lang/issues?page=2&per_page=50"
//! );
//! # Ok::<(), stencil::Error>(())
//! ```

mod bind;
mod encoder;
mod expand;
mod expander;
mod factory;
mod merge;
pub mod prelude;
mod resolver;

pub use bind::bind_variables;
pub use encoder::{FieldQueryMapEncoder, FormEncoder, JsonEncoder};
pub use expand::expand_arguments;
pub use expander::{CookieExpander, ToStringExpander};
pub use factory::{Strategy, TemplateFactory};
pub use merge::{merge_header_map, merge_query_map};
pub use resolver::{TemplateFactoryResolver, TemplateFactoryResolverBuilder};

// Re-export core types
pub use stencil_core::{
    Aggregate, BodyType, BoxError, CallMetadata, CallMetadataBuilder, ContentType, Cookie,
    EncodeError, Encoder, Error, Expander, ExpanderFactory, FieldOrder, HardCodedTarget, Method,
    Multimap, QueryMapEncoder, Record, Request, RequestTemplate, Result, Target, Value, Variables,
    encoding,
};

// Re-export the derive macro for `#[derive(Aggregate)]`
pub use stencil_macro::Aggregate;
