use crate::error::{ErrorKind, JsonLdError, Result};
use crate::iri::{self, IriResolver};
use crate::processor::JsonLdProcessor;
use ldtr_vocab::{is_context_keyword, is_keyword, jsonld};
use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;
use std::collections::HashMap;

/// Container types for JSON-LD @container values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    List,
    Set,
    Index,
    Language,
}

impl Container {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            jsonld::LIST => Some(Container::List),
            jsonld::SET => Some(Container::Set),
            jsonld::INDEX => Some(Container::Index),
            jsonld::LANGUAGE => Some(Container::Language),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Container::List => jsonld::LIST,
            Container::Set => jsonld::SET,
            Container::Index => jsonld::INDEX,
            Container::Language => jsonld::LANGUAGE,
        }
    }
}

/// Type mapping of a term: a keyword or a datatype IRI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMapping {
    Id,          // @id - value is an IRI reference
    Vocab,       // @vocab - value is a term or IRI reference
    Iri(String), // Specific datatype IRI
}

impl TypeMapping {
    pub fn as_str(&self) -> &str {
        match self {
            TypeMapping::Id => jsonld::ID,
            TypeMapping::Vocab => jsonld::VOCAB,
            TypeMapping::Iri(iri) => iri,
        }
    }
}

/// A single term definition. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDefinition {
    /// The IRI mapping (a keyword for aliases; the reverse IRI for reverse terms)
    pub iri: String,
    /// The type mapping (@type)
    pub type_mapping: Option<TypeMapping>,
    /// Container mapping (@container)
    pub container: Option<Container>,
    /// Language mapping. `Some(None)` means explicitly no language.
    pub language: Option<Option<String>>,
    /// Whether this is a reverse property (@reverse)
    pub reverse: bool,
}

impl TermDefinition {
    fn new(iri: String) -> Self {
        Self {
            iri,
            type_mapping: None,
            container: None,
            language: None,
            reverse: false,
        }
    }

    /// Serialize this definition to a local-context value.
    ///
    /// Returns a simple string if only the IRI mapping is set.
    pub fn to_json(&self) -> JsonValue {
        if !self.reverse
            && self.type_mapping.is_none()
            && self.container.is_none()
            && self.language.is_none()
        {
            return JsonValue::String(self.iri.clone());
        }

        let mut obj = Map::new();
        let iri_key = if self.reverse { jsonld::REVERSE } else { jsonld::ID };
        obj.insert(iri_key.to_string(), JsonValue::String(self.iri.clone()));
        if let Some(ref t) = self.type_mapping {
            obj.insert(jsonld::TYPE.to_string(), JsonValue::String(t.as_str().to_string()));
        }
        if let Some(c) = self.container {
            obj.insert(
                jsonld::CONTAINER.to_string(),
                JsonValue::String(c.as_str().to_string()),
            );
        }
        if let Some(ref lang) = self.language {
            let v = match lang {
                Some(l) => JsonValue::String(l.clone()),
                None => JsonValue::Null,
            };
            obj.insert(jsonld::LANGUAGE.to_string(), v);
        }
        JsonValue::Object(obj)
    }
}

/// The resolved term/base/vocab/language state used to interpret a subtree.
///
/// Context processing always works on a copy; a context held by an outer
/// call frame is never modified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveContext {
    /// Term definitions; `None` marks a term explicitly mapped to null
    terms: HashMap<String, Option<TermDefinition>>,
    /// Base IRI (@base)
    pub base: Option<String>,
    /// Vocabulary mapping (@vocab)
    pub vocab: Option<String>,
    /// Default language (@language), lowercased
    pub language: Option<String>,
}

impl ActiveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A freshly initialized context with the given base IRI
    pub fn with_base(base: Option<String>) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }

    /// Look up a term. `Some(None)` means the term is explicitly null.
    pub fn get(&self, term: &str) -> Option<Option<&TermDefinition>> {
        self.terms.get(term).map(|d| d.as_ref())
    }

    /// Look up a term's definition, treating null terms as undefined.
    pub fn term(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term).and_then(|d| d.as_ref())
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Container mapping of a term, if any
    pub fn container(&self, term: &str) -> Option<Container> {
        self.term(term).and_then(|d| d.container)
    }

    /// Serialize this context back to a local context object.
    ///
    /// Processing the result against an empty context reproduces the term
    /// definitions, vocab and language (the base is emitted as-is).
    pub fn to_json(&self) -> JsonValue {
        let mut ctx = Map::new();

        if let Some(ref base) = self.base {
            ctx.insert(jsonld::BASE.to_string(), JsonValue::String(base.clone()));
        }
        if let Some(ref vocab) = self.vocab {
            ctx.insert(jsonld::VOCAB.to_string(), JsonValue::String(vocab.clone()));
        }
        if let Some(ref lang) = self.language {
            ctx.insert(jsonld::LANGUAGE.to_string(), JsonValue::String(lang.clone()));
        }

        let mut keys: Vec<&String> = self.terms.keys().collect();
        keys.sort();
        for key in keys {
            let value = match &self.terms[key] {
                Some(def) => def.to_json(),
                None => JsonValue::Null,
            };
            ctx.insert(key.clone(), value);
        }

        JsonValue::Object(ctx)
    }
}

fn error(kind: ErrorKind, message: impl Into<String>) -> JsonLdError {
    JsonLdError::new(kind, message)
}

/// Context Processing: merge a local context into a copy of `active`.
pub(crate) fn process(
    processor: &JsonLdProcessor,
    active: &ActiveContext,
    local: &JsonValue,
) -> Result<ActiveContext> {
    let mut result = active.clone();
    let mut remote = Vec::new();
    process_into(processor, &mut result, local, &mut remote)?;
    Ok(result)
}

fn process_into(
    processor: &JsonLdProcessor,
    result: &mut ActiveContext,
    local: &JsonValue,
    remote: &mut Vec<String>,
) -> Result<()> {
    let items = match local {
        JsonValue::Array(arr) => arr.as_slice(),
        other => std::slice::from_ref(other),
    };

    for item in items {
        match item {
            JsonValue::Null => {
                let base = processor.options().initial_base().map(str::to_string);
                *result = ActiveContext::with_base(base);
            }
            JsonValue::String(s) => include_remote(processor, result, s, remote)?,
            JsonValue::Object(map) => process_map(processor, result, map, !remote.is_empty())?,
            other => {
                return Err(error(
                    ErrorKind::InvalidLocalContext,
                    "local context must be an object, string, array or null",
                )
                .with_data(other.clone()))
            }
        }
    }

    Ok(())
}

fn include_remote(
    processor: &JsonLdProcessor,
    result: &mut ActiveContext,
    reference: &str,
    remote: &mut Vec<String>,
) -> Result<()> {
    let iri = processor
        .resolver()
        .resolve(result.base.as_deref(), reference);

    if remote.contains(&iri) {
        return Err(error(
            ErrorKind::CyclicContext,
            format!("context '{}' includes itself", iri),
        )
        .with_data(JsonValue::Array(
            remote.iter().cloned().map(JsonValue::String).collect(),
        )));
    }

    let max_depth = processor.options().max_depth;
    if remote.len() >= max_depth {
        tracing::warn!(max_depth, iri = %iri, "remote context depth limit reached");
        return Err(error(
            ErrorKind::RecursionLimitExceeded,
            format!("remote contexts nest more than {} levels", max_depth),
        ));
    }

    let document = processor.loader().load(&iri).map_err(|e| {
        error(
            ErrorKind::LoadingRemoteContextFailed,
            format!("{}: {}", iri, e),
        )
    })?;
    tracing::debug!(iri = %iri, "loaded remote context");

    let context = match document {
        JsonValue::Object(mut map) => map.remove(jsonld::CONTEXT),
        _ => None,
    }
    .ok_or_else(|| {
        error(
            ErrorKind::InvalidRemoteContext,
            format!("document at '{}' has no top-level @context", iri),
        )
    })?;

    remote.push(iri);
    process_into(processor, result, &context, remote)?;
    remote.pop();
    Ok(())
}

fn process_map(
    processor: &JsonLdProcessor,
    result: &mut ActiveContext,
    map: &Map<String, JsonValue>,
    is_remote: bool,
) -> Result<()> {
    let resolver = processor.resolver();

    // @base is ignored inside remote contexts
    if let (Some(value), false) = (map.get(jsonld::BASE), is_remote) {
        result.base = match value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(resolver.resolve(result.base.as_deref(), s)),
            other => {
                return Err(error(ErrorKind::InvalidBaseIri, "@base must be a string or null")
                    .with_data(other.clone()))
            }
        };
    }

    if let Some(value) = map.get(jsonld::VOCAB) {
        result.vocab = match value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(resolver.resolve(result.base.as_deref(), s)),
            other => {
                return Err(error(
                    ErrorKind::InvalidVocabMapping,
                    "@vocab must be a string or null",
                )
                .with_data(other.clone()))
            }
        };
    }

    if let Some(value) = map.get(jsonld::LANGUAGE) {
        result.language = match value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.to_lowercase()),
            other => {
                return Err(error(
                    ErrorKind::InvalidDefaultLanguage,
                    "@language must be a string or null",
                )
                .with_data(other.clone()))
            }
        };
    }

    let mut builder = TermBuilder {
        active: result,
        local: map,
        defined: HashMap::new(),
        resolver,
        depth: 0,
        max_depth: processor.options().max_depth,
    };
    for key in map.keys() {
        if is_context_keyword(key) {
            continue;
        }
        builder.define(key)?;
    }

    tracing::debug!(
        terms = builder.defined.len(),
        vocab = ?builder.active.vocab,
        "processed local context"
    );
    Ok(())
}

/// Builds term definitions from one local context object into an active
/// context. `defined` tracks terms in progress (`false`) and done (`true`)
/// for the duration of one context object.
struct TermBuilder<'c> {
    active: &'c mut ActiveContext,
    local: &'c Map<String, JsonValue>,
    defined: HashMap<String, bool>,
    resolver: &'c dyn IriResolver,
    /// Nesting of on-demand definitions currently in progress
    depth: usize,
    max_depth: usize,
}

impl<'c> TermBuilder<'c> {
    fn define(&mut self, term: &str) -> Result<()> {
        if self.depth >= self.max_depth {
            tracing::warn!(max_depth = self.max_depth, term, "term definition depth limit reached");
            return Err(error(
                ErrorKind::RecursionLimitExceeded,
                format!(
                    "defining '{}' requires more than {} nested term definitions",
                    term, self.max_depth
                ),
            ));
        }
        self.depth += 1;
        let outcome = self.define_term(term);
        self.depth -= 1;
        outcome
    }

    fn define_term(&mut self, term: &str) -> Result<()> {
        match self.defined.get(term) {
            Some(true) => return Ok(()),
            Some(false) => {
                return Err(error(
                    ErrorKind::CyclicIriMapping,
                    format!("term '{}' depends on itself", term),
                ))
            }
            None => {}
        }
        self.defined.insert(term.to_string(), false);

        if is_keyword(term) {
            return Err(error(
                ErrorKind::KeywordRedefinition,
                format!("'{}' is a keyword and cannot be redefined", term),
            ));
        }

        self.active.terms.remove(term);

        let local = self.local;
        let value = local.get(term).ok_or_else(|| {
            error(
                ErrorKind::InvalidTermDefinition,
                format!("no definition for '{}' in local context", term),
            )
        })?;

        let map: Cow<'_, Map<String, JsonValue>> = match value {
            JsonValue::Null => return self.finish_null(term),
            JsonValue::String(s) => {
                let mut m = Map::new();
                m.insert(jsonld::ID.to_string(), JsonValue::String(s.clone()));
                Cow::Owned(m)
            }
            JsonValue::Object(m) => {
                if matches!(m.get(jsonld::ID), Some(JsonValue::Null)) {
                    return self.finish_null(term);
                }
                Cow::Borrowed(m)
            }
            other => {
                return Err(error(
                    ErrorKind::InvalidTermDefinition,
                    format!("definition of '{}' must be a string, object or null", term),
                )
                .with_data(other.clone()))
            }
        };

        let type_mapping = self.type_mapping(term, &map)?;

        if let Some(rev) = map.get(jsonld::REVERSE).filter(|v| !v.is_null()) {
            let mut definition = self.reverse_definition(term, &map, rev)?;
            definition.type_mapping = type_mapping;
            return self.finish(term, definition);
        }

        let iri = match map.get(jsonld::ID) {
            Some(id) if id.as_str() != Some(term) => self.explicit_iri(term, id)?,
            _ => self.derived_iri(term)?,
        };

        let mut definition = TermDefinition::new(iri);
        definition.type_mapping = type_mapping;
        definition.container = match map.get(jsonld::CONTAINER) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(c)) => Some(Container::parse(c).ok_or_else(|| {
                error(
                    ErrorKind::InvalidContainerMapping,
                    format!("unknown @container '{}' for term '{}'", c, term),
                )
            })?),
            Some(other) => {
                return Err(error(
                    ErrorKind::InvalidContainerMapping,
                    format!("@container of '{}' must be a string", term),
                )
                .with_data(other.clone()))
            }
        };

        if !map.contains_key(jsonld::TYPE) {
            definition.language = match map.get(jsonld::LANGUAGE) {
                None => None,
                Some(JsonValue::Null) => Some(None),
                Some(JsonValue::String(l)) => Some(Some(l.to_lowercase())),
                Some(other) => {
                    return Err(error(
                        ErrorKind::InvalidLanguageMapping,
                        format!("@language of '{}' must be a string or null", term),
                    )
                    .with_data(other.clone()))
                }
            };
        }

        self.finish(term, definition)
    }

    fn finish(&mut self, term: &str, definition: TermDefinition) -> Result<()> {
        self.active.terms.insert(term.to_string(), Some(definition));
        self.defined.insert(term.to_string(), true);
        Ok(())
    }

    fn finish_null(&mut self, term: &str) -> Result<()> {
        self.active.terms.insert(term.to_string(), None);
        self.defined.insert(term.to_string(), true);
        Ok(())
    }

    fn type_mapping(
        &mut self,
        term: &str,
        map: &Map<String, JsonValue>,
    ) -> Result<Option<TypeMapping>> {
        let t = match map.get(jsonld::TYPE) {
            None | Some(JsonValue::Null) => return Ok(None),
            Some(JsonValue::String(t)) => t,
            Some(other) => {
                return Err(error(
                    ErrorKind::InvalidTypeMapping,
                    format!("@type of '{}' must be a string", term),
                )
                .with_data(other.clone()))
            }
        };

        match self.expand_iri(t, true, false)?.as_deref() {
            Some(jsonld::ID) => Ok(Some(TypeMapping::Id)),
            Some(jsonld::VOCAB) => Ok(Some(TypeMapping::Vocab)),
            Some(expanded) if iri::is_absolute(expanded) => {
                Ok(Some(TypeMapping::Iri(expanded.to_string())))
            }
            _ => Err(error(
                ErrorKind::InvalidTypeMapping,
                format!("@type '{}' of '{}' is not @id, @vocab or an absolute IRI", t, term),
            )),
        }
    }

    fn reverse_definition(
        &mut self,
        term: &str,
        map: &Map<String, JsonValue>,
        rev: &JsonValue,
    ) -> Result<TermDefinition> {
        if map.contains_key(jsonld::ID) {
            return Err(error(
                ErrorKind::InvalidReverseProperty,
                format!("term '{}' cannot have both @id and @reverse", term),
            ));
        }

        let rev = rev.as_str().ok_or_else(|| {
            error(
                ErrorKind::InvalidIriMapping,
                format!("@reverse of '{}' must be a string", term),
            )
            .with_data(rev.clone())
        })?;

        let iri = self
            .expand_iri(rev, true, false)?
            .filter(|e| iri::any_iri(e))
            .ok_or_else(|| {
                error(
                    ErrorKind::InvalidIriMapping,
                    format!("@reverse '{}' of '{}' is not an IRI or blank node", rev, term),
                )
            })?;

        let container = match map.get(jsonld::CONTAINER) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(c)) if c == jsonld::SET => Some(Container::Set),
            Some(JsonValue::String(c)) if c == jsonld::INDEX => Some(Container::Index),
            Some(other) => {
                return Err(error(
                    ErrorKind::InvalidReverseProperty,
                    format!("reverse property '{}' only supports @set or @index containers", term),
                )
                .with_data(other.clone()))
            }
        };

        Ok(TermDefinition {
            iri,
            type_mapping: None,
            container,
            language: None,
            reverse: true,
        })
    }

    fn explicit_iri(&mut self, term: &str, id: &JsonValue) -> Result<String> {
        let id = id.as_str().ok_or_else(|| {
            error(
                ErrorKind::InvalidIriMapping,
                format!("@id of '{}' must be a string", term),
            )
            .with_data(id.clone())
        })?;

        let expanded = self
            .expand_iri(id, true, false)?
            .filter(|e| is_keyword(e) || iri::any_iri(e))
            .ok_or_else(|| {
                error(
                    ErrorKind::InvalidIriMapping,
                    format!("@id '{}' of '{}' is not a keyword, IRI or blank node", id, term),
                )
            })?;

        if expanded == jsonld::CONTEXT {
            return Err(error(
                ErrorKind::InvalidKeywordAlias,
                format!("'{}' cannot alias @context", term),
            ));
        }
        Ok(expanded)
    }

    fn derived_iri(&mut self, term: &str) -> Result<String> {
        if let Some((prefix, suffix)) = iri::split_prefix(term) {
            if self.local.contains_key(prefix) && !is_context_keyword(prefix) {
                self.define(prefix)?;
            }
            return Ok(match self.active.term(prefix) {
                Some(def) => format!("{}{}", def.iri, suffix),
                None => term.to_string(),
            });
        }

        match self.active.vocab {
            Some(ref vocab) => Ok(format!("{}{}", vocab, term)),
            None => Err(error(
                ErrorKind::InvalidIriMapping,
                format!("term '{}' has no IRI mapping and no @vocab is set", term),
            )),
        }
    }

    /// IRI Expansion during context construction: terms of the local
    /// context are defined on demand before they are looked up.
    fn expand_iri(
        &mut self,
        value: &str,
        vocab: bool,
        document_relative: bool,
    ) -> Result<Option<String>> {
        if !is_keyword(value) {
            self.define_pending(value)?;
            let known_term = vocab && self.active.contains(value);
            if !known_term {
                if let Some((prefix, suffix)) = iri::split_prefix(value) {
                    if prefix != "_" && !suffix.starts_with("//") {
                        self.define_pending(prefix)?;
                    }
                }
            }
        }
        Ok(iri::expand_iri(
            self.active,
            value,
            vocab,
            document_relative,
            self.resolver,
        ))
    }

    fn define_pending(&mut self, term: &str) -> Result<()> {
        if self.local.contains_key(term)
            && !is_context_keyword(term)
            && self.defined.get(term) != Some(&true)
        {
            self.define(term)?;
        }
        Ok(())
    }
}
