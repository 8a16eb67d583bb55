use crate::context::{self, ActiveContext};
use crate::error::Result;
use crate::expand;
use crate::iri::{self, IriResolver, PassThroughResolver};
use crate::loader::{ContextLoader, NoRemoteContexts};
use crate::options::ExpandOptions;
use crate::value;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Entry point bundling options with the injected loader and resolver.
///
/// Cheap to clone and safe to share across threads; every call builds its own
/// active context chain.
#[derive(Debug, Clone)]
pub struct JsonLdProcessor {
    options: ExpandOptions,
    loader: Arc<dyn ContextLoader>,
    resolver: Arc<dyn IriResolver>,
}

impl Default for JsonLdProcessor {
    fn default() -> Self {
        Self::new(ExpandOptions::default())
    }
}

impl JsonLdProcessor {
    pub fn new(options: ExpandOptions) -> Self {
        Self {
            options,
            loader: Arc::new(NoRemoteContexts),
            resolver: Arc::new(PassThroughResolver),
        }
    }

    /// Use `loader` to dereference string contexts
    pub fn with_loader(mut self, loader: Arc<dyn ContextLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Use `resolver` for relative IRI resolution
    pub fn with_resolver(mut self, resolver: Arc<dyn IriResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }

    pub fn loader(&self) -> &dyn ContextLoader {
        self.loader.as_ref()
    }

    pub fn resolver(&self) -> &dyn IriResolver {
        self.resolver.as_ref()
    }

    /// A fresh active context for one top-level call.
    pub fn initial_context(&self) -> ActiveContext {
        ActiveContext::with_base(self.options.initial_base().map(str::to_string))
    }

    /// Merge a local context (object, string, array or null) into a copy of
    /// `active`.
    pub fn process_context(
        &self,
        active: &ActiveContext,
        local: &JsonValue,
    ) -> Result<ActiveContext> {
        context::process(self, active, local)
    }

    /// Expand a document under a fresh active context.
    pub fn expand(&self, document: &JsonValue) -> Result<JsonValue> {
        self.expand_with_context(document, None, None)
    }

    /// Expand `document` under `context` (a fresh context when `None`) with
    /// the given active property.
    ///
    /// With no active property the result is normalized to an array.
    pub fn expand_with_context(
        &self,
        document: &JsonValue,
        context: Option<&ActiveContext>,
        active_property: Option<&str>,
    ) -> Result<JsonValue> {
        match context {
            Some(ctx) => expand::document(self, ctx, document, active_property),
            None => expand::document(self, &self.initial_context(), document, active_property),
        }
    }

    /// IRI Expansion using this processor's resolver.
    pub fn expand_iri(
        &self,
        context: &ActiveContext,
        value: &str,
        vocab: bool,
        document_relative: bool,
    ) -> Option<String> {
        iri::expand_iri(context, value, vocab, document_relative, self.resolver())
    }

    /// Value Expansion of a scalar under `active_property`.
    pub fn expand_value(
        &self,
        context: &ActiveContext,
        active_property: &str,
        value: &JsonValue,
    ) -> JsonValue {
        value::expand_value(context, active_property, value, self.resolver())
    }
}
