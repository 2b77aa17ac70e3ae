//! Per-method template factories.
//!
//! A [`TemplateFactory`] is built once per API method by the
//! [`TemplateFactoryResolver`](crate::TemplateFactoryResolver) and turns each
//! call's arguments into a resolved [`RequestTemplate`]:
//!
//! 1. seed the target URL (from the [`Target`], or the URL argument)
//! 2. expand aggregate arguments
//! 3. bind variables, running expanders
//! 4. encode the form or body, depending on the [`Strategy`]
//! 5. substitute placeholders
//! 6. merge the query map and header map arguments

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug_span, trace};

use crate::bind::{argument, bind_variables, override_target};
use crate::expand::expand_arguments;
use crate::merge::{merge_header_map, merge_query_map};
use crate::{
    BodyType, CallMetadata, Encoder, Error, Expander, QueryMapEncoder, RequestTemplate, Result,
    Target, Value, Variables,
};

/// How the arguments of a call end up in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Arguments only fill template placeholders.
    Plain,
    /// Form parameters are encoded as the body.
    FormEncoded,
    /// One argument, or all of them, are encoded as the body.
    BodyEncoded,
}

impl Strategy {
    /// Pick the strategy for a method.
    ///
    /// Form parameters win unless the template has its own body; then an
    /// explicit body argument or whole-argument body; otherwise plain.
    #[must_use]
    pub fn select(metadata: &CallMetadata) -> Self {
        if !metadata.form_params().is_empty() && metadata.template().body_template_str().is_none()
        {
            Self::FormEncoded
        } else if metadata.body_index().is_some() || metadata.always_encode_body() {
            Self::BodyEncoded
        } else {
            Self::Plain
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::FormEncoded => "form-encoded",
            Self::BodyEncoded => "body-encoded",
        })
    }
}

/// Builds resolved request templates for one API method.
///
/// Cheap to clone and safe to share across threads; it holds no per-call
/// state.
#[derive(Clone, derive_more::Debug)]
pub struct TemplateFactory {
    metadata: Arc<CallMetadata>,
    strategy: Strategy,
    #[debug(skip)]
    target: Arc<dyn Target>,
    #[debug(skip)]
    expanders: Arc<BTreeMap<usize, Arc<dyn Expander>>>,
    #[debug(skip)]
    encoder: Arc<dyn Encoder>,
    #[debug(skip)]
    query_map_encoder: Arc<dyn QueryMapEncoder>,
}

impl TemplateFactory {
    pub(crate) fn new(
        metadata: Arc<CallMetadata>,
        strategy: Strategy,
        target: Arc<dyn Target>,
        expanders: BTreeMap<usize, Arc<dyn Expander>>,
        encoder: Arc<dyn Encoder>,
        query_map_encoder: Arc<dyn QueryMapEncoder>,
    ) -> Self {
        Self {
            strategy,
            metadata,
            target,
            expanders: Arc::new(expanders),
            encoder,
            query_map_encoder,
        }
    }

    /// The strategy chosen for this method.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The method's call metadata.
    #[must_use]
    pub fn metadata(&self) -> &CallMetadata {
        &self.metadata
    }

    /// Build a resolved template from the call's arguments.
    ///
    /// The blueprint template is never modified.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] when a required argument (URL, body) is
    ///   null, a position is out of range, or an expander rejects a value
    /// - [`Error::Encode`] when the body, form or a map argument cannot be
    ///   encoded
    /// - [`Error::MissingVariable`] when a placeholder has no bound value
    pub fn create(&self, argv: &[Value]) -> Result<RequestTemplate> {
        let span = debug_span!(
            "create_template",
            config_key = self.metadata.config_key(),
            strategy = %self.strategy
        );
        let _enter = span.enter();

        let mut template = self.metadata.template().clone();
        template.set_target(self.target.url());
        if let Some(index) = self.metadata.url_index() {
            override_target(&mut template, argv, index)?;
        }

        let argv = expand_arguments(argv, self.metadata.index_to_expand());
        let variables = bind_variables(&argv, self.metadata.index_to_name(), &self.expanders)?;
        trace!(arguments = argv.len(), variables = variables.len(), "bound variables");

        let mut template = self.resolve(&argv, template, &variables)?;

        if let Some(index) = self.metadata.query_map_index() {
            merge_query_map(
                &mut template,
                argument(&argv, index)?,
                self.query_map_encoder.as_ref(),
            )?;
        }
        if let Some(index) = self.metadata.header_map_index() {
            merge_header_map(
                &mut template,
                argument(&argv, index)?,
                self.query_map_encoder.as_ref(),
            )?;
        }

        Ok(template)
    }

    fn resolve(
        &self,
        argv: &[Value],
        mut template: RequestTemplate,
        variables: &Variables,
    ) -> Result<RequestTemplate> {
        match self.strategy {
            Strategy::Plain => {}
            Strategy::FormEncoded => self.encode_form(&mut template, variables)?,
            Strategy::BodyEncoded => self.encode_body(&mut template, argv)?,
        }
        template.mark_already_encoded(self.metadata.encoded_names());
        template.resolve(variables)
    }

    fn encode_form(&self, template: &mut RequestTemplate, variables: &Variables) -> Result<()> {
        let form_params = self.metadata.form_params();
        let form = variables.filter(|name| form_params.contains(name));
        trace!(fields = form.len(), "encoding form");

        template.mark_already_encoded(form_params.iter().map(String::as_str));
        self.encoder
            .encode(&form.into_value(), &BodyType::FormMap, template)
            .map_err(Error::into_encode)
    }

    fn encode_body(&self, template: &mut RequestTemplate, argv: &[Value]) -> Result<()> {
        let (payload, body_type) = if self.metadata.always_encode_body() {
            (Value::List(argv.to_vec()), &BodyType::Arguments)
        } else {
            let index = self.metadata.body_index().unwrap_or_default();
            let body = argument(argv, index)?;
            if body.is_null() {
                return Err(Error::invalid_argument(format!(
                    "Body parameter {index} was null"
                )));
            }
            (body.clone(), self.metadata.body_type())
        };
        trace!(kind = payload.kind(), "encoding body");

        self.encoder
            .encode(&payload, body_type, template)
            .map_err(Error::into_encode)
    }
}
