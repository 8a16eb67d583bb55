//! JSON-LD keyword registry for ldtr
//!
//! This crate is the single source of the reserved JSON-LD 1.0 keywords and
//! the keyword sets the expansion core consults.
//!
//! # Organization
//!
//! - `jsonld` - individual keyword constants (`@id`, `@type`, ...)
//! - `KEYWORDS` - every reserved keyword
//! - `CONTEXT_KEYWORDS` - the keywords handled directly by context processing
//!
//! The sets are plain `&'static` slices; they are read-only and shared freely
//! across threads.

/// JSON-LD keyword constants
pub mod jsonld {
    /// @context
    pub const CONTEXT: &str = "@context";

    /// @base
    pub const BASE: &str = "@base";

    /// @vocab
    pub const VOCAB: &str = "@vocab";

    /// @language
    pub const LANGUAGE: &str = "@language";

    /// @id
    pub const ID: &str = "@id";

    /// @type
    pub const TYPE: &str = "@type";

    /// @value
    pub const VALUE: &str = "@value";

    /// @container
    pub const CONTAINER: &str = "@container";

    /// @set
    pub const SET: &str = "@set";

    /// @list
    pub const LIST: &str = "@list";

    /// @index
    pub const INDEX: &str = "@index";

    /// @graph
    pub const GRAPH: &str = "@graph";

    /// @reverse
    pub const REVERSE: &str = "@reverse";
}

/// Keywords processed directly by the context processing algorithm.
pub const CONTEXT_KEYWORDS: &[&str] = &[jsonld::BASE, jsonld::VOCAB, jsonld::LANGUAGE];

/// Every reserved keyword. Terms may not redefine any of these.
pub const KEYWORDS: &[&str] = &[
    jsonld::CONTEXT,
    jsonld::BASE,
    jsonld::VOCAB,
    jsonld::LANGUAGE,
    jsonld::ID,
    jsonld::TYPE,
    jsonld::VALUE,
    jsonld::CONTAINER,
    jsonld::SET,
    jsonld::LIST,
    jsonld::INDEX,
    jsonld::GRAPH,
    jsonld::REVERSE,
];

/// Returns true if `s` is a reserved JSON-LD keyword.
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Returns true if `s` is handled by context processing itself rather than
/// the term definition builder.
pub fn is_context_keyword(s: &str) -> bool {
    CONTEXT_KEYWORDS.contains(&s)
}
