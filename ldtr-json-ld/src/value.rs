//! Value Expansion: a scalar reached through a property becomes a value
//! object or a node reference.

use crate::context::{ActiveContext, TypeMapping};
use crate::iri::{self, IriResolver};
use ldtr_vocab::jsonld;
use serde_json::{Map, Value as JsonValue};

/// Expand a scalar `value` reached through `active_property`.
///
/// String values under an `@id`/`@vocab` type mapping become `{"@id": ...}`;
/// everything else becomes `{"@value": ...}` with the term's datatype, or for
/// strings its language (falling back to the default language).
pub fn expand_value(
    context: &ActiveContext,
    active_property: &str,
    value: &JsonValue,
    resolver: &dyn IriResolver,
) -> JsonValue {
    let definition = context.term(active_property);
    let type_mapping = definition.and_then(|d| d.type_mapping.as_ref());

    if let (Some(TypeMapping::Id | TypeMapping::Vocab), JsonValue::String(s)) = (type_mapping, value)
    {
        let vocab = matches!(type_mapping, Some(TypeMapping::Vocab));
        return match iri::expand_iri(context, s, vocab, true, resolver) {
            Some(id) => node_reference(id),
            None => JsonValue::Null,
        };
    }

    let mut result = Map::new();
    result.insert(jsonld::VALUE.to_string(), value.clone());

    match type_mapping {
        Some(TypeMapping::Iri(datatype)) => {
            result.insert(jsonld::TYPE.to_string(), JsonValue::String(datatype.clone()));
        }
        Some(_) => {}
        None => {
            if value.is_string() {
                let language = match definition.and_then(|d| d.language.as_ref()) {
                    Some(mapped) => mapped.as_ref(),
                    None => context.language.as_ref(),
                };
                if let Some(lang) = language {
                    result.insert(jsonld::LANGUAGE.to_string(), JsonValue::String(lang.clone()));
                }
            }
        }
    }

    JsonValue::Object(result)
}

fn node_reference(id: String) -> JsonValue {
    let mut obj = Map::new();
    obj.insert(jsonld::ID.to_string(), JsonValue::String(id));
    JsonValue::Object(obj)
}
