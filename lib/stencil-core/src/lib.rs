//! Core types and traits for the stencil request template engine.
//!
//! This crate provides the data the engine works on and the contracts of
//! its collaborators:
//! - [`Value`], [`Record`], [`Cookie`] - Dynamic argument values
//! - [`Aggregate`] and [`FieldOrder`] - Ahead-of-time field order of structural aggregates
//! - [`CallMetadata`] - Static description of one API method
//! - [`RequestTemplate`] and [`Multimap`] - The request being built
//! - [`Variables`] - Bound template variables
//! - [`Encoder`], [`QueryMapEncoder`], [`Expander`], [`Target`] - Collaborator traits
//! - [`Request`] - Transport handoff
//! - [`Error`] and [`Result`] - Error handling

mod body;
mod codec;
pub mod encoding;
mod error;
mod metadata;
mod method;
mod multimap;
mod request;
mod target;
mod template;
mod value;
mod variables;

pub use body::{BodyType, ContentType};
pub use codec::{Encoder, Expander, QueryMapEncoder};
pub use error::{BoxError, EncodeError, Error, Result};
pub use metadata::{CallMetadata, CallMetadataBuilder, ExpanderFactory};
pub use method::Method;
pub use multimap::Multimap;
pub use request::Request;
pub use target::{HardCodedTarget, Target};
pub use template::RequestTemplate;
pub use value::{Aggregate, Cookie, FieldOrder, Record, Value};
pub use variables::Variables;
