//! Template factory resolution.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::{
    CallMetadata, Encoder, Error, Expander, FieldQueryMapEncoder, FormEncoder, JsonEncoder,
    QueryMapEncoder, Result, Strategy, Target, TemplateFactory,
};

/// Chooses and builds the [`TemplateFactory`] of each API method.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use stencil::prelude::*;
///
/// let resolver = TemplateFactoryResolver::with_defaults();
/// let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/users/{id}"))
///     .name(0, "id")
///     .build();
/// let factory = resolver.resolve(
///     Arc::new(HardCodedTarget::from_url("http://localhost:8080")),
///     Arc::new(metadata),
/// );
///
/// let template = factory.create(&[Value::from(7)])?;
/// assert_eq!(template.url(), "http://localhost:8080/users/7");
/// # Ok::<(), stencil::Error>(())
/// ```
#[derive(Clone, derive_more::Debug)]
pub struct TemplateFactoryResolver {
    #[debug(skip)]
    encoder: Arc<dyn Encoder>,
    #[debug(skip)]
    query_map_encoder: Arc<dyn QueryMapEncoder>,
}

impl TemplateFactoryResolver {
    /// Create a resolver from its collaborators.
    #[must_use]
    pub fn new(encoder: Arc<dyn Encoder>, query_map_encoder: Arc<dyn QueryMapEncoder>) -> Self {
        Self {
            encoder,
            query_map_encoder,
        }
    }

    /// Create a new resolver builder.
    #[must_use]
    pub fn builder() -> TemplateFactoryResolverBuilder {
        TemplateFactoryResolverBuilder::default()
    }

    /// A resolver encoding forms as URL-encoded bodies, other bodies as JSON,
    /// and reading query maps from record fields.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(FormEncoder::new(JsonEncoder)),
            Arc::new(FieldQueryMapEncoder),
        )
    }

    /// Build the factory of one API method.
    ///
    /// The strategy is chosen here, once: form parameters (unless the
    /// template has a body of its own), then a body argument, then plain
    /// substitution. Expander constructors are run here too; an explicit
    /// expander instance for the same position takes precedence.
    #[must_use]
    pub fn resolve(&self, target: Arc<dyn Target>, metadata: Arc<CallMetadata>) -> TemplateFactory {
        let expanders = expanders_of(&metadata);
        let strategy = Strategy::select(&metadata);
        debug!(
            config_key = metadata.config_key(),
            target = target.name(),
            %strategy,
            expanders = expanders.len(),
            "resolved template factory"
        );
        TemplateFactory::new(
            metadata,
            strategy,
            target,
            expanders,
            Arc::clone(&self.encoder),
            Arc::clone(&self.query_map_encoder),
        )
    }
}

fn expanders_of(metadata: &CallMetadata) -> BTreeMap<usize, Arc<dyn Expander>> {
    if !metadata.index_to_expander().is_empty() {
        return metadata.index_to_expander().clone();
    }
    metadata
        .index_to_expander_factory()
        .iter()
        .map(|(&index, factory)| (index, factory()))
        .collect()
}

/// Builder for [`TemplateFactoryResolver`].
#[derive(Clone, Default, derive_more::Debug)]
pub struct TemplateFactoryResolverBuilder {
    #[debug(skip)]
    encoder: Option<Arc<dyn Encoder>>,
    #[debug(skip)]
    query_map_encoder: Option<Arc<dyn QueryMapEncoder>>,
}

impl TemplateFactoryResolverBuilder {
    /// Set the body and form encoder.
    #[must_use]
    pub fn encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    /// Set the query and header map encoder.
    #[must_use]
    pub fn query_map_encoder(mut self, encoder: impl QueryMapEncoder + 'static) -> Self {
        self.query_map_encoder = Some(Arc::new(encoder));
        self
    }

    /// Build the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when a collaborator is missing.
    pub fn build(self) -> Result<TemplateFactoryResolver> {
        let encoder = self.encoder.ok_or_else(|| Error::construction("encoder"))?;
        let query_map_encoder = self
            .query_map_encoder
            .ok_or_else(|| Error::construction("query map encoder"))?;
        Ok(TemplateFactoryResolver::new(encoder, query_map_encoder))
    }
}
