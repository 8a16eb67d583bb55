use serde::{Deserialize, Serialize};

/// Default recursion limit for node/array expansion
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options controlling context processing and expansion.
///
/// Deserializable so callers can carry it in their own configuration files;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpandOptions {
    /// Explicit base IRI. Overrides `document_iri` when a `null` local context
    /// resets the active context.
    pub base: Option<String>,
    /// IRI of the document being processed
    pub document_iri: Option<String>,
    /// Maximum nesting depth accepted by expansion
    pub max_depth: usize,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            base: None,
            document_iri: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ExpandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_document_iri(mut self, iri: impl Into<String>) -> Self {
        self.document_iri = Some(iri.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The base IRI a freshly initialized active context starts from.
    pub fn initial_base(&self) -> Option<&str> {
        self.base.as_deref().or(self.document_iri.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let opts = ExpandOptions::default();
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(opts.initial_base(), None);
    }

    #[test]
    fn test_base_overrides_document_iri() {
        let opts = ExpandOptions::new()
            .with_document_iri("http://example.org/doc")
            .with_base("http://example.org/base/");
        assert_eq!(opts.initial_base(), Some("http://example.org/base/"));

        let opts = ExpandOptions::new().with_document_iri("http://example.org/doc");
        assert_eq!(opts.initial_base(), Some("http://example.org/doc"));
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: ExpandOptions =
            serde_json::from_value(json!({"documentIri": "http://example.org/", "maxDepth": 8}))
                .unwrap();
        assert_eq!(opts.document_iri.as_deref(), Some("http://example.org/"));
        assert_eq!(opts.max_depth, 8);
        assert_eq!(opts.base, None);
    }
}
