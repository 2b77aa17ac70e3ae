//! Prelude module for convenient imports.
//!
//! ```ignore
//! use stencil::prelude::*;
//! ```

pub use crate::{
    Aggregate, BodyType, CallMetadata, Cookie, CookieExpander, Encoder, Error, Expander,
    FieldOrder, FieldQueryMapEncoder, FormEncoder, HardCodedTarget, JsonEncoder, Method,
    QueryMapEncoder, Record, RequestTemplate, Result, Strategy, Target, TemplateFactory,
    TemplateFactoryResolver, ToStringExpander, Value,
};
