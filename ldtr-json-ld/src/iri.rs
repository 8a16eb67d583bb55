//! IRI helpers and the IRI Expansion algorithm.

use crate::context::ActiveContext;
use ldtr_vocab::is_keyword;

/// Resolves a (possibly relative) IRI against a base IRI.
///
/// Injected by the caller; the expansion core never performs resolution on
/// its own.
pub trait IriResolver: Send + Sync + std::fmt::Debug {
    fn resolve(&self, base: Option<&str>, iri: &str) -> String;
}

/// Returns every IRI unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughResolver;

impl IriResolver for PassThroughResolver {
    fn resolve(&self, _base: Option<&str>, iri: &str) -> String {
        iri.to_string()
    }
}

/// Naive base/relative join: fragments append to the base, absolute IRIs
/// pass through, anything else is appended after a `/`.
///
/// This is not RFC 3986 resolution; dot segments and `..` are not handled.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinResolver;

impl IriResolver for JoinResolver {
    fn resolve(&self, base: Option<&str>, iri: &str) -> String {
        match base {
            Some(base) if !iri.starts_with("_:") => join(base, iri),
            _ => iri.to_string(),
        }
    }
}

/// Split a token at its first colon into (prefix, suffix).
pub fn split_prefix(s: &str) -> Option<(&str, &str)> {
    s.find(':').map(|pos| (&s[..pos], &s[pos + 1..]))
}

/// Returns true if string contains a colon (looks like an IRI, compact IRI or
/// blank node identifier)
pub fn any_iri(s: &str) -> bool {
    s.contains(':')
}

/// Returns true if the IRI is absolute (has an RFC 3986 scheme).
///
/// An absolute IRI starts with a scheme: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`.
pub fn is_absolute(iri: &str) -> bool {
    if let Some(colon_pos) = iri.find(':') {
        let scheme = &iri[..colon_pos];
        !scheme.is_empty()
            && scheme.as_bytes()[0].is_ascii_alphabetic()
            && scheme
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
    } else {
        false
    }
}

/// Join base IRI with relative IRI
pub fn join(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        base.to_string()
    } else if relative.starts_with('#') {
        let base = base.split('#').next().unwrap_or(base);
        format!("{}{}", base, relative)
    } else if is_absolute(relative) {
        relative.to_string()
    } else if base.ends_with('/') || base.ends_with('#') {
        format!("{}{}", base, relative)
    } else {
        format!("{}/{}", base, relative)
    }
}

/// IRI Expansion over a finished active context.
///
/// Returns `None` for a term explicitly mapped to null when `vocab` is set;
/// callers treat that as the JSON-LD `null`.
///
/// Resolution order: keywords pass through, then (vocab only) exact term
/// match, then compact IRI via a prefix term, then `@vocab` concatenation,
/// then base resolution when `document_relative`.
pub fn expand_iri(
    context: &ActiveContext,
    value: &str,
    vocab: bool,
    document_relative: bool,
    resolver: &dyn IriResolver,
) -> Option<String> {
    if is_keyword(value) {
        return Some(value.to_string());
    }

    if vocab {
        if let Some(entry) = context.get(value) {
            return entry.map(|def| def.iri.clone());
        }
    }

    if let Some((prefix, suffix)) = split_prefix(value) {
        if prefix == "_" || suffix.starts_with("//") {
            return Some(value.to_string());
        }
        if let Some(Some(def)) = context.get(prefix) {
            return Some(format!("{}{}", def.iri, suffix));
        }
        return Some(value.to_string());
    }

    if vocab {
        if let Some(ref v) = context.vocab {
            return Some(format!("{}{}", v, value));
        }
    }

    if document_relative {
        return Some(resolver.resolve(context.base.as_deref(), value));
    }

    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::JsonLdProcessor;
    use serde_json::json;

    fn ctx(local: serde_json::Value) -> ActiveContext {
        JsonLdProcessor::default()
            .process_context(&ActiveContext::new(), &local)
            .unwrap()
    }

    #[test]
    fn test_split_prefix() {
        assert_eq!(split_prefix("schema:name"), Some(("schema", "name")));
        assert_eq!(split_prefix("http://example.org"), Some(("http", "//example.org")));
        assert_eq!(split_prefix("_:b0"), Some(("_", "b0")));
        assert_eq!(split_prefix("noColon"), None);
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("http://example.org"));
        assert!(is_absolute("urn:isbn:0451450523"));
        assert!(is_absolute("did:example:123"));
        assert!(!is_absolute("_:b0"));
        assert!(!is_absolute("localName"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn test_join() {
        assert_eq!(join("http://example.org/", "name"), "http://example.org/name");
        assert_eq!(join("http://example.org", "name"), "http://example.org/name");
        assert_eq!(
            join("http://example.org/doc#top", "#fragment"),
            "http://example.org/doc#fragment"
        );
        assert_eq!(join("http://example.org/", "urn:x:1"), "urn:x:1");
    }

    #[test]
    fn test_resolvers() {
        assert_eq!(PassThroughResolver.resolve(Some("http://a/"), "b"), "b");
        assert_eq!(JoinResolver.resolve(Some("http://a/"), "b"), "http://a/b");
        assert_eq!(JoinResolver.resolve(None, "b"), "b");
        assert_eq!(JoinResolver.resolve(Some("http://a/"), "_:b1"), "_:b1");
    }

    #[test]
    fn test_keyword_and_term() {
        let c = ctx(json!({"name": "http://schema.org/name"}));
        let r = &PassThroughResolver;
        assert_eq!(expand_iri(&c, "@type", true, false, r).as_deref(), Some("@type"));
        assert_eq!(
            expand_iri(&c, "name", true, false, r).as_deref(),
            Some("http://schema.org/name")
        );
        // terms only apply under vocab
        assert_eq!(expand_iri(&c, "name", false, true, r).as_deref(), Some("name"));
    }

    #[test]
    fn test_compact_and_absolute() {
        let c = ctx(json!({"schema": "http://schema.org/"}));
        let r = &PassThroughResolver;
        assert_eq!(
            expand_iri(&c, "schema:Person", false, false, r).as_deref(),
            Some("http://schema.org/Person")
        );
        assert_eq!(
            expand_iri(&c, "schema://x", true, false, r).as_deref(),
            Some("schema://x")
        );
        assert_eq!(expand_iri(&c, "_:b0", true, false, r).as_deref(), Some("_:b0"));
        assert_eq!(
            expand_iri(&c, "not:matching", true, false, r).as_deref(),
            Some("not:matching")
        );
    }

    #[test]
    fn test_vocab_and_base() {
        let c = ctx(json!({"@vocab": "http://ex.org/", "@base": "http://base.org/"}));
        assert_eq!(
            expand_iri(&c, "knows", true, false, &PassThroughResolver).as_deref(),
            Some("http://ex.org/knows")
        );
        assert_eq!(
            expand_iri(&c, "bob", false, true, &PassThroughResolver).as_deref(),
            Some("bob")
        );
        assert_eq!(
            expand_iri(&c, "bob", false, true, &JoinResolver).as_deref(),
            Some("http://base.org/bob")
        );
    }

    #[test]
    fn test_null_term() {
        let c = ctx(json!({"@vocab": "http://ex.org/", "hidden": null}));
        assert_eq!(expand_iri(&c, "hidden", true, false, &PassThroughResolver), None);
        assert_eq!(
            expand_iri(&c, "hidden", false, false, &PassThroughResolver).as_deref(),
            Some("hidden")
        );
    }
}
