//! JSON-LD context processing and expansion
//!
//! This library turns context-relative JSON-LD into expanded form:
//! - Context processing (terms, `@base`, `@vocab`, `@language`, remote contexts)
//! - IRI and value expansion
//! - Document expansion
//! - Graph indexing of expanded documents
//!
//! # Example
//!
//! ```
//! use ldtr_json_ld::{expand, expand_iri, process_context};
//! use serde_json::json;
//!
//! // Process a context
//! let ctx = process_context(None, &json!({
//!     "schema": "http://schema.org/",
//!     "name": "schema:name"
//! })).unwrap();
//!
//! // Expand an IRI
//! let expanded = expand_iri(&ctx, "schema:Person", true, false);
//! assert_eq!(expanded.as_deref(), Some("http://schema.org/Person"));
//!
//! // Expand a document
//! let doc = json!({
//!     "@context": {"@vocab": "http://ex.org/"},
//!     "name": "Ann",
//!     "knows": {"@id": "http://ex.org/bob"}
//! });
//! let expanded_doc = expand(&doc).unwrap();
//! assert_eq!(expanded_doc, json!([{
//!     "http://ex.org/name": [{"@value": "Ann"}],
//!     "http://ex.org/knows": [{"@id": "http://ex.org/bob"}]
//! }]));
//! ```
//!
//! Remote contexts and relative IRI resolution are supplied by the caller
//! through [`ContextLoader`] and [`IriResolver`] on a [`JsonLdProcessor`].

pub mod bnode;
pub mod context;
pub mod error;
pub mod expand;
pub mod index;
pub mod iri;
pub mod loader;
pub mod options;
pub mod processor;
pub mod value;

pub use bnode::BlankNodeGenerator;
pub use context::{ActiveContext, Container, TermDefinition, TypeMapping};
pub use error::{ErrorKind, JsonLdError, Result};
pub use index::{GraphIndex, IndexError, IndexOptions};
pub use iri::{IriResolver, JoinResolver, PassThroughResolver};
pub use loader::{BoxError, ContextLoader, LoaderError, NoRemoteContexts, StaticContextLoader};
pub use options::{ExpandOptions, DEFAULT_MAX_DEPTH};
pub use processor::JsonLdProcessor;

use serde_json::Value as JsonValue;

/// Process a local context.
///
/// # Arguments
/// * `active` - The context to build on (a fresh one when `None`)
/// * `local` - The local context (object, string, array, or null)
///
/// # Example
/// ```
/// use ldtr_json_ld::process_context;
/// use serde_json::json;
///
/// let ctx = process_context(None, &json!({"schema": "http://schema.org/"})).unwrap();
/// assert!(ctx.contains("schema"));
/// ```
pub fn process_context(active: Option<&ActiveContext>, local: &JsonValue) -> Result<ActiveContext> {
    let processor = JsonLdProcessor::default();
    match active {
        Some(active) => processor.process_context(active, local),
        None => processor.process_context(&processor.initial_context(), local),
    }
}

/// Expand a JSON-LD document.
///
/// The result is always an array of node objects.
pub fn expand(document: &JsonValue) -> Result<JsonValue> {
    JsonLdProcessor::default().expand(document)
}

/// Expand a document under an existing context and active property.
pub fn expand_with_context(
    document: &JsonValue,
    context: Option<&ActiveContext>,
    active_property: Option<&str>,
) -> Result<JsonValue> {
    JsonLdProcessor::default().expand_with_context(document, context, active_property)
}

/// Expand a term, compact IRI, or relative IRI.
///
/// Returns `None` for a term explicitly mapped to null.
pub fn expand_iri(
    context: &ActiveContext,
    value: &str,
    vocab: bool,
    document_relative: bool,
) -> Option<String> {
    iri::expand_iri(context, value, vocab, document_relative, &PassThroughResolver)
}

/// Expand a scalar reached through `active_property`.
pub fn expand_value(context: &ActiveContext, active_property: &str, value: &JsonValue) -> JsonValue {
    value::expand_value(context, active_property, value, &PassThroughResolver)
}

/// Index an expanded document by `@id`.
pub fn index(
    expanded: &JsonValue,
    options: IndexOptions,
) -> std::result::Result<GraphIndex, IndexError> {
    index::index(expanded, options)
}
