//! Remote `@context` loading.
//!
//! The expansion core never performs I/O. Callers that want string contexts
//! to work inject a [`ContextLoader`]; fetching, caching and retry policy
//! belong to that implementation.

use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Boxed error returned by loaders
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Loads the JSON document a remote context IRI refers to.
pub trait ContextLoader: Send + Sync + std::fmt::Debug {
    fn load(&self, iri: &str) -> Result<JsonValue, BoxError>;
}

/// Error for IRIs a loader does not know about
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("remote context loading is not configured (requested {0})")]
    NotConfigured(String),

    #[error("no document registered for {0}")]
    NotFound(String),
}

/// Default loader: every remote context fails to load.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemoteContexts;

impl ContextLoader for NoRemoteContexts {
    fn load(&self, iri: &str) -> Result<JsonValue, BoxError> {
        Err(Box::new(LoaderError::NotConfigured(iri.to_string())))
    }
}

/// Serves remote contexts from documents the caller registered up front.
#[derive(Debug, Clone, Default)]
pub struct StaticContextLoader {
    documents: HashMap<String, JsonValue>,
}

impl StaticContextLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` under `iri`, replacing any earlier registration.
    pub fn insert(&mut self, iri: impl Into<String>, document: JsonValue) {
        self.documents.insert(iri.into(), document);
    }

    pub fn with_document(mut self, iri: impl Into<String>, document: JsonValue) -> Self {
        self.insert(iri, document);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ContextLoader for StaticContextLoader {
    fn load(&self, iri: &str) -> Result<JsonValue, BoxError> {
        self.documents
            .get(iri)
            .cloned()
            .ok_or_else(|| Box::new(LoaderError::NotFound(iri.to_string())) as BoxError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_remote_contexts() {
        let err = NoRemoteContexts.load("http://example.org/ctx").unwrap_err();
        assert!(err.to_string().contains("http://example.org/ctx"));
    }

    #[test]
    fn test_static_loader() {
        let loader = StaticContextLoader::new()
            .with_document("http://example.org/ctx", json!({"@context": {"a": "http://a/"}}));
        assert_eq!(loader.len(), 1);
        assert_eq!(
            loader.load("http://example.org/ctx").unwrap(),
            json!({"@context": {"a": "http://a/"}})
        );
        assert!(loader.load("http://example.org/other").is_err());
    }
}
