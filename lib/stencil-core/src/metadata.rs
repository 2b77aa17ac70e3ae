//! Call metadata.
//!
//! [`CallMetadata`] is the static description of one API method: its
//! blueprint [`RequestTemplate`] and how each argument position feeds it.
//! It is built once (usually by generated code), then shared read-only by
//! every call of that method.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::{Aggregate, BodyType, Expander, FieldOrder, RequestTemplate};

/// Constructor of an [`Expander`], run once when a template factory is built.
pub type ExpanderFactory = fn() -> Arc<dyn Expander>;

/// Static description of how to build a request template from arguments.
///
/// All positions refer to the argument vector, with one exception: the
/// positions used for names, bodies and maps are taken *after* aggregate
/// expansion, where every expanded argument occupies one slot per field of
/// its [`FieldOrder`]. The URL position is read before expansion.
#[derive(Clone, derive_more::Debug)]
pub struct CallMetadata {
    config_key: String,
    template: RequestTemplate,
    index_to_name: BTreeMap<usize, Vec<String>>,
    index_to_expand: BTreeMap<usize, FieldOrder>,
    #[debug(skip)]
    index_to_expander: BTreeMap<usize, Arc<dyn Expander>>,
    #[debug(skip)]
    index_to_expander_factory: BTreeMap<usize, ExpanderFactory>,
    form_params: BTreeSet<String>,
    body_index: Option<usize>,
    body_type: BodyType,
    always_encode_body: bool,
    url_index: Option<usize>,
    query_map_index: Option<usize>,
    header_map_index: Option<usize>,
    index_to_encoded: BTreeSet<usize>,
}

impl CallMetadata {
    /// Start building metadata around a blueprint template.
    #[must_use]
    pub fn builder(template: RequestTemplate) -> CallMetadataBuilder {
        CallMetadataBuilder::new(template)
    }

    /// Identifier of the API method, for logs.
    #[must_use]
    pub fn config_key(&self) -> &str {
        &self.config_key
    }

    /// Blueprint request template.
    #[must_use]
    pub const fn template(&self) -> &RequestTemplate {
        &self.template
    }

    /// Argument position to the variable names bound to it.
    #[must_use]
    pub const fn index_to_name(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.index_to_name
    }

    /// Names bound to one position.
    #[must_use]
    pub fn names_at(&self, index: usize) -> &[String] {
        self.index_to_name
            .get(&index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Positions holding aggregates to expand, with their field order.
    #[must_use]
    pub const fn index_to_expand(&self) -> &BTreeMap<usize, FieldOrder> {
        &self.index_to_expand
    }

    /// Explicit expander instances by position.
    #[must_use]
    pub const fn index_to_expander(&self) -> &BTreeMap<usize, Arc<dyn Expander>> {
        &self.index_to_expander
    }

    /// Expander constructors by position.
    #[must_use]
    pub const fn index_to_expander_factory(&self) -> &BTreeMap<usize, ExpanderFactory> {
        &self.index_to_expander_factory
    }

    /// Names sent as form fields.
    #[must_use]
    pub const fn form_params(&self) -> &BTreeSet<String> {
        &self.form_params
    }

    /// Position of the body argument.
    #[must_use]
    pub const fn body_index(&self) -> Option<usize> {
        self.body_index
    }

    /// Declared type of the body argument.
    #[must_use]
    pub const fn body_type(&self) -> &BodyType {
        &self.body_type
    }

    /// Whether the whole argument vector is the body.
    #[must_use]
    pub const fn always_encode_body(&self) -> bool {
        self.always_encode_body
    }

    /// Position of the argument overriding the target URL.
    #[must_use]
    pub const fn url_index(&self) -> Option<usize> {
        self.url_index
    }

    /// Position of the query map argument.
    #[must_use]
    pub const fn query_map_index(&self) -> Option<usize> {
        self.query_map_index
    }

    /// Position of the header map argument.
    #[must_use]
    pub const fn header_map_index(&self) -> Option<usize> {
        self.header_map_index
    }

    /// Positions whose names bypass percent-encoding.
    #[must_use]
    pub const fn index_to_encoded(&self) -> &BTreeSet<usize> {
        &self.index_to_encoded
    }

    /// Names bound at the already-encoded positions.
    pub fn encoded_names(&self) -> impl Iterator<Item = &str> {
        self.index_to_encoded
            .iter()
            .flat_map(|index| self.names_at(*index))
            .map(String::as_str)
    }
}

/// Builder for [`CallMetadata`].
#[derive(Debug, Clone)]
#[must_use]
pub struct CallMetadataBuilder {
    metadata: CallMetadata,
}

impl CallMetadataBuilder {
    /// Create a builder around a blueprint template.
    pub fn new(template: RequestTemplate) -> Self {
        Self {
            metadata: CallMetadata {
                config_key: String::new(),
                template,
                index_to_name: BTreeMap::new(),
                index_to_expand: BTreeMap::new(),
                index_to_expander: BTreeMap::new(),
                index_to_expander_factory: BTreeMap::new(),
                form_params: BTreeSet::new(),
                body_index: None,
                body_type: BodyType::default(),
                always_encode_body: false,
                url_index: None,
                query_map_index: None,
                header_map_index: None,
                index_to_encoded: BTreeSet::new(),
            },
        }
    }

    /// Set the identifier of the API method (e.g. `UserApi#get_user`).
    pub fn config_key(mut self, key: impl Into<String>) -> Self {
        self.metadata.config_key = key.into();
        self
    }

    /// Bind a variable name to a position; a position may feed several names.
    pub fn name(mut self, index: usize, name: impl Into<String>) -> Self {
        self.metadata
            .index_to_name
            .entry(index)
            .or_default()
            .push(name.into());
        self
    }

    /// Expand the aggregate at `index` following `order`.
    pub fn expand(mut self, index: usize, order: FieldOrder) -> Self {
        self.metadata.index_to_expand.insert(index, order);
        self
    }

    /// Expand the aggregate at `index` in the declared order of `T`.
    pub fn expand_aggregate<T: Aggregate>(self, index: usize) -> Self {
        self.expand(index, FieldOrder::of::<T>())
    }

    /// Register an expander instance for a position.
    pub fn expander(mut self, index: usize, expander: Arc<dyn Expander>) -> Self {
        self.metadata.index_to_expander.insert(index, expander);
        self
    }

    /// Register an expander constructor for a position.
    pub fn expander_factory(mut self, index: usize, factory: ExpanderFactory) -> Self {
        self.metadata
            .index_to_expander_factory
            .insert(index, factory);
        self
    }

    /// Send a variable as a form field.
    pub fn form_param(mut self, name: impl Into<String>) -> Self {
        self.metadata.form_params.insert(name.into());
        self
    }

    /// Use the argument at `index` as the body.
    pub fn body(mut self, index: usize, body_type: BodyType) -> Self {
        self.metadata.body_index = Some(index);
        self.metadata.body_type = body_type;
        self
    }

    /// Send the whole argument vector as the body.
    pub fn always_encode_body(mut self, always: bool) -> Self {
        self.metadata.always_encode_body = always;
        self
    }

    /// Override the target URL with the argument at `index`.
    pub fn url_index(mut self, index: usize) -> Self {
        self.metadata.url_index = Some(index);
        self
    }

    /// Merge the argument at `index` into the query string.
    pub fn query_map_index(mut self, index: usize) -> Self {
        self.metadata.query_map_index = Some(index);
        self
    }

    /// Merge the argument at `index` into the headers.
    pub fn header_map_index(mut self, index: usize) -> Self {
        self.metadata.header_map_index = Some(index);
        self
    }

    /// Mark the names bound at `index` as already percent-encoded.
    pub fn encoded(mut self, index: usize) -> Self {
        self.metadata.index_to_encoded.insert(index);
        self
    }

    /// Build the metadata.
    #[must_use]
    pub fn build(self) -> CallMetadata {
        self.metadata
    }
}
