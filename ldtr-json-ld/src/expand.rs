//! Node/Array Expansion: turns a context-relative JSON-LD document into
//! context-free expanded form.

use crate::context::{ActiveContext, Container};
use crate::error::{ErrorKind, JsonLdError, Result};
use crate::iri;
use crate::processor::JsonLdProcessor;
use crate::value::expand_value;
use ldtr_vocab::{is_keyword, jsonld};
use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;
use std::collections::HashSet;

fn error(kind: ErrorKind, message: impl Into<String>) -> JsonLdError {
    JsonLdError::new(kind, message)
}

/// Top-level expansion.
///
/// Without an active property the result is always an array: a lone object
/// holding only `@graph` is replaced by its graph, `null` becomes `[]`, and
/// any other single result is wrapped.
pub(crate) fn document(
    processor: &JsonLdProcessor,
    context: &ActiveContext,
    element: &JsonValue,
    active_property: Option<&str>,
) -> Result<JsonValue> {
    let expander = Expander { processor };
    let expanded = expander.element(context, element, active_property, 0)?;

    if active_property.is_some() {
        return Ok(expanded);
    }

    Ok(match expanded {
        JsonValue::Null => JsonValue::Array(vec![]),
        JsonValue::Array(items) => JsonValue::Array(items),
        JsonValue::Object(mut map) if map.len() == 1 && map.contains_key(jsonld::GRAPH) => {
            match map.remove(jsonld::GRAPH) {
                Some(JsonValue::Array(items)) => JsonValue::Array(items),
                Some(other) => JsonValue::Array(vec![other]),
                None => JsonValue::Array(vec![]),
            }
        }
        other => JsonValue::Array(vec![other]),
    })
}

fn is_free_floating(active_property: Option<&str>) -> bool {
    matches!(active_property, None | Some(jsonld::GRAPH))
}

fn is_value_object(v: &JsonValue) -> bool {
    v.as_object().is_some_and(|m| m.contains_key(jsonld::VALUE))
}

fn is_list_object(v: &JsonValue) -> bool {
    v.as_object().is_some_and(|m| m.contains_key(jsonld::LIST))
}

/// Items of an expanded value, one array level flattened
fn into_items(value: JsonValue) -> Vec<JsonValue> {
    match value {
        JsonValue::Array(items) => items,
        JsonValue::Null => vec![],
        other => vec![other],
    }
}

/// Append `items` to the array member `key` of `target`, creating it if
/// needed. Duplicates are kept.
fn append(target: &mut Map<String, JsonValue>, key: &str, items: Vec<JsonValue>) {
    let entry = target
        .entry(key.to_string())
        .or_insert_with(|| JsonValue::Array(vec![]));
    match entry {
        JsonValue::Array(arr) => arr.extend(items),
        other => {
            let mut arr = vec![other.take()];
            arr.extend(items);
            *other = JsonValue::Array(arr);
        }
    }
}

/// Merge node references into the `@reverse` map of `result` under
/// `property`, rejecting value and list objects.
fn add_reverse(
    result: &mut Map<String, JsonValue>,
    property: &str,
    items: Vec<JsonValue>,
) -> Result<()> {
    if let Some(bad) = items.iter().find(|i| is_value_object(i) || is_list_object(i)) {
        return Err(error(
            ErrorKind::InvalidReversePropertyValue,
            format!("reverse property '{}' must reference nodes", property),
        )
        .with_data(bad.clone()));
    }

    let reverse = result
        .entry(jsonld::REVERSE.to_string())
        .or_insert_with(|| JsonValue::Object(Map::new()));
    if let JsonValue::Object(map) = reverse {
        append(map, property, items);
    }
    Ok(())
}

fn sorted_keys(map: &Map<String, JsonValue>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}

struct Expander<'p> {
    processor: &'p JsonLdProcessor,
}

impl<'p> Expander<'p> {
    fn element(
        &self,
        context: &ActiveContext,
        element: &JsonValue,
        active_property: Option<&str>,
        depth: usize,
    ) -> Result<JsonValue> {
        let max_depth = self.processor.options().max_depth;
        if depth > max_depth {
            tracing::warn!(max_depth, "expansion depth limit reached");
            return Err(error(
                ErrorKind::RecursionLimitExceeded,
                format!("input nesting exceeds {} levels", max_depth),
            ));
        }

        match element {
            JsonValue::Null => Ok(JsonValue::Null),
            JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_) => {
                match active_property {
                    None | Some(jsonld::GRAPH) => Ok(JsonValue::Null),
                    Some(prop) => Ok(expand_value(
                        context,
                        prop,
                        element,
                        self.processor.resolver(),
                    )),
                }
            }
            JsonValue::Array(items) => self.array(context, items, active_property, depth),
            JsonValue::Object(map) => self.object(context, map, active_property, depth),
        }
    }

    fn array(
        &self,
        context: &ActiveContext,
        items: &[JsonValue],
        active_property: Option<&str>,
        depth: usize,
    ) -> Result<JsonValue> {
        let in_list = match active_property {
            Some(jsonld::LIST) => true,
            Some(prop) => context.container(prop) == Some(Container::List),
            None => false,
        };

        let mut result = Vec::with_capacity(items.len());
        for item in items {
            let expanded = self.element(context, item, active_property, depth + 1)?;
            if in_list && (expanded.is_array() || is_list_object(&expanded)) {
                return Err(error(ErrorKind::ListOfLists, "lists of lists are not supported")
                    .with_data(item.clone()));
            }
            result.extend(into_items(expanded));
        }
        Ok(JsonValue::Array(result))
    }

    fn object(
        &self,
        context: &ActiveContext,
        element: &Map<String, JsonValue>,
        active_property: Option<&str>,
        depth: usize,
    ) -> Result<JsonValue> {
        let context: Cow<'_, ActiveContext> = match element.get(jsonld::CONTEXT) {
            Some(local) => Cow::Owned(self.processor.process_context(context, local)?),
            None => Cow::Borrowed(context),
        };
        let context = context.as_ref();
        let resolver = self.processor.resolver();

        let mut result = Map::new();
        let mut keywords_seen = HashSet::new();

        for key in sorted_keys(element) {
            if key == jsonld::CONTEXT {
                continue;
            }
            let value = &element[key.as_str()];

            let expanded_property = match iri::expand_iri(context, key, true, false, resolver) {
                Some(p) if is_keyword(&p) || iri::any_iri(&p) => p,
                _ => {
                    tracing::trace!(key = %key, "dropping key without IRI mapping");
                    continue;
                }
            };

            if is_keyword(&expanded_property) {
                // tracked apart from `result`: reverse terms also fill @reverse
                if !keywords_seen.insert(expanded_property.clone()) {
                    return Err(error(
                        ErrorKind::CollidingKeywords,
                        format!("'{}' appears more than once", expanded_property),
                    ));
                }
                self.keyword(
                    context,
                    &mut result,
                    &expanded_property,
                    value,
                    active_property,
                    depth,
                )?;
                continue;
            }

            let container = context.container(key);
            let expanded = match (container, value) {
                (Some(Container::Language), JsonValue::Object(map)) => language_map(map)?,
                (Some(Container::Index), JsonValue::Object(map)) => {
                    self.index_map(context, key, map, depth)?
                }
                _ => self.element(context, value, Some(key.as_str()), depth + 1)?,
            };

            if expanded.is_null() {
                continue;
            }

            if container == Some(Container::List) && !is_list_object(&expanded) {
                let mut list = Map::new();
                list.insert(
                    jsonld::LIST.to_string(),
                    JsonValue::Array(into_items(expanded)),
                );
                append(&mut result, &expanded_property, vec![JsonValue::Object(list)]);
            } else if context.term(key).is_some_and(|d| d.reverse) {
                add_reverse(&mut result, &expanded_property, into_items(expanded))?;
            } else {
                append(&mut result, &expanded_property, into_items(expanded));
            }
        }

        finalize(result, active_property)
    }

    /// Expand one keyword member of a node object into `result`.
    fn keyword(
        &self,
        context: &ActiveContext,
        result: &mut Map<String, JsonValue>,
        keyword: &str,
        value: &JsonValue,
        active_property: Option<&str>,
        depth: usize,
    ) -> Result<()> {
        let resolver = self.processor.resolver();

        if active_property == Some(jsonld::REVERSE) {
            return Err(error(
                ErrorKind::InvalidReversePropertyMap,
                format!("keyword '{}' is not allowed inside a @reverse map", keyword),
            ));
        }
        let expanded = match keyword {
            jsonld::ID => match value {
                JsonValue::String(s) => iri::expand_iri(context, s, false, true, resolver)
                    .map(JsonValue::String)
                    .unwrap_or(JsonValue::Null),
                other => {
                    return Err(error(ErrorKind::InvalidIdValue, "@id must be a string")
                        .with_data(other.clone()))
                }
            },
            jsonld::TYPE => match value {
                JsonValue::String(s) => iri::expand_iri(context, s, true, true, resolver)
                    .map(JsonValue::String)
                    .unwrap_or(JsonValue::Null),
                JsonValue::Array(items) if items.iter().all(JsonValue::is_string) => {
                    JsonValue::Array(
                        items
                            .iter()
                            .filter_map(JsonValue::as_str)
                            .filter_map(|s| iri::expand_iri(context, s, true, true, resolver))
                            .map(JsonValue::String)
                            .collect(),
                    )
                }
                other => {
                    return Err(error(
                        ErrorKind::InvalidTypeValue,
                        "@type must be a string or an array of strings",
                    )
                    .with_data(other.clone()))
                }
            },
            jsonld::GRAPH => {
                match self.element(context, value, Some(jsonld::GRAPH), depth + 1)? {
                    JsonValue::Null => JsonValue::Null,
                    JsonValue::Array(items) => JsonValue::Array(items),
                    other => JsonValue::Array(vec![other]),
                }
            }
            jsonld::VALUE => match value {
                JsonValue::Object(_) | JsonValue::Array(_) => {
                    return Err(error(
                        ErrorKind::InvalidValueObject,
                        "@value must be a scalar or null",
                    )
                    .with_data(value.clone()))
                }
                // null is kept: its meaning depends on a sibling @type
                JsonValue::Null => {
                    result.insert(jsonld::VALUE.to_string(), JsonValue::Null);
                    return Ok(());
                }
                scalar => scalar.clone(),
            },
            jsonld::LANGUAGE => match value {
                JsonValue::String(s) => JsonValue::String(s.to_lowercase()),
                other => {
                    return Err(error(
                        ErrorKind::InvalidLanguageTaggedString,
                        "@language must be a string",
                    )
                    .with_data(other.clone()))
                }
            },
            jsonld::INDEX => match value {
                JsonValue::String(s) => JsonValue::String(s.clone()),
                other => {
                    return Err(error(ErrorKind::InvalidIndexValue, "@index must be a string")
                        .with_data(other.clone()))
                }
            },
            jsonld::LIST => {
                if is_free_floating(active_property) {
                    return Ok(());
                }
                self.list(context, value, active_property, depth)?
            }
            jsonld::SET => self.element(context, value, active_property, depth + 1)?,
            jsonld::REVERSE => {
                let map = match value {
                    JsonValue::Object(map) => map,
                    other => {
                        return Err(error(ErrorKind::InvalidReverseValue, "@reverse must be an object")
                            .with_data(other.clone()))
                    }
                };
                self.reverse_map(context, result, map, depth)?;
                return Ok(());
            }
            _ => return Ok(()),
        };

        if !expanded.is_null() {
            result.insert(keyword.to_string(), expanded);
        }
        Ok(())
    }

    fn list(
        &self,
        context: &ActiveContext,
        value: &JsonValue,
        active_property: Option<&str>,
        depth: usize,
    ) -> Result<JsonValue> {
        let items = match value {
            JsonValue::Array(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };

        let mut result = Vec::with_capacity(items.len());
        for item in items {
            if item.is_array() {
                return Err(error(ErrorKind::ListOfLists, "@list may not contain arrays")
                    .with_data(item.clone()));
            }
            let expanded = self.element(context, item, active_property, depth + 1)?;
            if is_list_object(&expanded) {
                return Err(error(ErrorKind::ListOfLists, "@list may not contain lists")
                    .with_data(expanded));
            }
            result.extend(into_items(expanded));
        }
        Ok(JsonValue::Array(result))
    }

    /// Expand a `@reverse` member. Twice-reversed properties merge forward
    /// into `result`; the rest land in `result`'s own `@reverse` map.
    fn reverse_map(
        &self,
        context: &ActiveContext,
        result: &mut Map<String, JsonValue>,
        value: &Map<String, JsonValue>,
        depth: usize,
    ) -> Result<()> {
        let expanded = self.object(context, value, Some(jsonld::REVERSE), depth + 1)?;
        let JsonValue::Object(mut expanded) = expanded else {
            return Ok(());
        };

        if let Some(JsonValue::Object(twice)) = expanded.remove(jsonld::REVERSE) {
            for (property, items) in twice {
                append(result, &property, into_items(items));
            }
        }

        for (property, items) in expanded {
            add_reverse(result, &property, into_items(items))?;
        }
        Ok(())
    }

    /// Expand an index map: each entry's values are expanded under `key`
    /// and tagged with the index unless they carry their own.
    fn index_map(
        &self,
        context: &ActiveContext,
        key: &str,
        map: &Map<String, JsonValue>,
        depth: usize,
    ) -> Result<JsonValue> {
        let mut result = Vec::new();
        for index in sorted_keys(map) {
            let values = match &map[index.as_str()] {
                JsonValue::Array(items) => JsonValue::Array(items.clone()),
                other => JsonValue::Array(vec![other.clone()]),
            };
            let expanded = self.element(context, &values, Some(key), depth + 1)?;
            for mut item in into_items(expanded) {
                if let JsonValue::Object(ref mut obj) = item {
                    obj.entry(jsonld::INDEX.to_string())
                        .or_insert_with(|| JsonValue::String(index.clone()));
                }
                result.push(item);
            }
        }
        Ok(JsonValue::Array(result))
    }
}

/// Expand a language map into language-tagged value objects.
fn language_map(map: &Map<String, JsonValue>) -> Result<JsonValue> {
    let mut result = Vec::new();
    for lang in sorted_keys(map) {
        let values = match &map[lang.as_str()] {
            JsonValue::Array(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };
        for item in values {
            let s = item.as_str().ok_or_else(|| {
                error(
                    ErrorKind::InvalidLanguageMapValue,
                    format!("language map value for '{}' must be a string", lang),
                )
                .with_data(item.clone())
            })?;
            let mut obj = Map::new();
            obj.insert(jsonld::VALUE.to_string(), JsonValue::String(s.to_string()));
            obj.insert(jsonld::LANGUAGE.to_string(), JsonValue::String(lang.to_lowercase()));
            result.push(JsonValue::Object(obj));
        }
    }
    Ok(JsonValue::Array(result))
}

/// Validate and normalize a built node, value, set or list object.
fn finalize(mut result: Map<String, JsonValue>, active_property: Option<&str>) -> Result<JsonValue> {
    if let Some(value) = result.get(jsonld::VALUE) {
        let has_language = result.contains_key(jsonld::LANGUAGE);
        let has_type = result.contains_key(jsonld::TYPE);
        let extra = result.keys().find(|k| {
            !matches!(
                k.as_str(),
                jsonld::VALUE | jsonld::LANGUAGE | jsonld::TYPE | jsonld::INDEX
            )
        });
        if extra.is_some() || (has_language && has_type) {
            return Err(error(
                ErrorKind::InvalidValueObject,
                "value objects may only carry @language or @type, and @index",
            )
            .with_data(JsonValue::Object(result)));
        }
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        if has_language && !value.is_string() {
            return Err(error(
                ErrorKind::InvalidLanguageTaggedValue,
                "only strings can be language-tagged",
            )
            .with_data(JsonValue::Object(result)));
        }
        if let Some(t) = result.get(jsonld::TYPE) {
            if !t.as_str().is_some_and(iri::any_iri) {
                return Err(error(ErrorKind::InvalidTypedValue, "@type of a value must be an IRI")
                    .with_data(JsonValue::Object(result)));
            }
        }
    } else if let Some(t) = result.get_mut(jsonld::TYPE).filter(|t| !t.is_array()) {
        *t = JsonValue::Array(vec![t.take()]);
    } else if result.contains_key(jsonld::SET) || result.contains_key(jsonld::LIST) {
        // @set and @list together count as a second member
        let others = result.len() - 1;
        if others > 1 || (others == 1 && !result.contains_key(jsonld::INDEX)) {
            return Err(error(
                ErrorKind::InvalidSetOrListObject,
                "@set and @list objects may only carry @index",
            )
            .with_data(JsonValue::Object(result)));
        }
        if let Some(set) = result.remove(jsonld::SET) {
            return Ok(set);
        }
    }

    if result.len() == 1 && result.contains_key(jsonld::LANGUAGE) {
        return Ok(JsonValue::Null);
    }

    if is_free_floating(active_property)
        && (result.is_empty()
            || result.contains_key(jsonld::VALUE)
            || result.contains_key(jsonld::LIST)
            || (result.len() == 1 && result.contains_key(jsonld::ID)))
    {
        return Ok(JsonValue::Null);
    }

    Ok(JsonValue::Object(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expand(doc: JsonValue) -> Result<JsonValue> {
        JsonLdProcessor::default().expand(&doc)
    }

    fn kind(doc: JsonValue) -> ErrorKind {
        expand(doc).unwrap_err().kind()
    }

    #[test]
    fn test_expand_node_basic() {
        let doc = json!({
            "@context": {
                "ical": "http://www.w3.org/2002/12/cal/ical#",
                "xsd": "http://www.w3.org/2001/XMLSchema#",
                "ical:dtstart": {"@type": "xsd:dateTime"}
            },
            "ical:summary": "Lady Gaga Concert",
            "ical:dtstart": "2011-04-09T20:00:00Z"
        });

        let result = expand(doc).unwrap();
        assert_eq!(
            result,
            json!([{
                "http://www.w3.org/2002/12/cal/ical#summary": [{"@value": "Lady Gaga Concert"}],
                "http://www.w3.org/2002/12/cal/ical#dtstart": [{
                    "@value": "2011-04-09T20:00:00Z",
                    "@type": "http://www.w3.org/2001/XMLSchema#dateTime"
                }]
            }])
        );
    }

    #[test]
    fn test_expand_list_container() {
        let doc = json!({
            "@context": {
                "nick": {"@id": "http://xmlns.com/foaf/0.1/nick", "@container": "@list"}
            },
            "@id": "http://example.org/people#joebob",
            "nick": ["joe", "bob", "jaybee"]
        });

        let result = expand(doc).unwrap();
        assert_eq!(
            result[0]["http://xmlns.com/foaf/0.1/nick"],
            json!([{"@list": [{"@value": "joe"}, {"@value": "bob"}, {"@value": "jaybee"}]}])
        );
    }

    #[test]
    fn test_expand_set_flattens() {
        let doc = json!({
            "@context": {"foaf": "http://xmlns.com/foaf/0.1/"},
            "@id": "http://example.org/people#joebob",
            "foaf:nick": {"@set": ["joe", "bob"]}
        });

        let result = expand(doc).unwrap();
        assert_eq!(
            result[0]["http://xmlns.com/foaf/0.1/nick"],
            json!([{"@value": "joe"}, {"@value": "bob"}])
        );
    }

    #[test]
    fn test_false_value_survives() {
        let doc = json!({"@id": "http://ex.org/foo", "http://ex.org/bar": {"@value": false}});
        let result = expand(doc).unwrap();
        assert_eq!(result[0]["http://ex.org/bar"], json!([{"@value": false}]));
    }

    #[test]
    fn test_null_value_drops_member() {
        let doc = json!({"@id": "http://ex.org/foo", "http://ex.org/bar": {"@value": null}});
        let result = expand(doc).unwrap();
        assert_eq!(result, json!([]));
    }

    #[test]
    fn test_keys_without_mapping_dropped() {
        let doc = json!({"@id": "http://ex.org/a", "local": "x", "http://ex.org/p": "y"});
        let result = expand(doc).unwrap();
        assert_eq!(
            result,
            json!([{"@id": "http://ex.org/a", "http://ex.org/p": [{"@value": "y"}]}])
        );
    }

    #[test]
    fn test_graph_unwrapped() {
        let doc = json!({
            "@context": {"@vocab": "http://ex.org/"},
            "@graph": [
                {"@id": "http://ex.org/a", "name": "A"},
                {"@id": "http://ex.org/b"},
                "free-floating"
            ]
        });
        let result = expand(doc).unwrap();
        assert_eq!(
            result,
            json!([{"@id": "http://ex.org/a", "http://ex.org/name": [{"@value": "A"}]}])
        );
    }

    #[test]
    fn test_named_graph_kept() {
        let doc = json!({
            "@id": "http://ex.org/g",
            "@graph": {"@id": "http://ex.org/a", "http://ex.org/p": 1}
        });
        let result = expand(doc).unwrap();
        assert_eq!(
            result,
            json!([{
                "@id": "http://ex.org/g",
                "@graph": [{"@id": "http://ex.org/a", "http://ex.org/p": [{"@value": 1}]}]
            }])
        );
    }

    #[test]
    fn test_type_normalized_to_array() {
        let doc = json!({
            "@context": {"@vocab": "http://schema.org/"},
            "@id": "http://ex.org/a",
            "@type": "Person"
        });
        let result = expand(doc).unwrap();
        assert_eq!(result[0]["@type"], json!(["http://schema.org/Person"]));
    }

    #[test]
    fn test_language_only_object_collapses() {
        let doc = json!({"@id": "http://ex.org/a", "http://ex.org/p": {"@language": "en"}});
        assert_eq!(expand(doc).unwrap(), json!([]));
    }

    #[test]
    fn test_depth_limit() {
        let mut doc = json!("leaf");
        for _ in 0..10 {
            doc = json!({"http://ex.org/p": doc});
        }
        let processor = JsonLdProcessor::new(crate::ExpandOptions::new().with_max_depth(5));
        let err = processor.expand(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecursionLimitExceeded);

        assert!(JsonLdProcessor::default().expand(&doc).is_ok());
    }

    #[test]
    fn test_value_object_errors() {
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@value": {"a": 1}}})),
            ErrorKind::InvalidValueObject
        );
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@value": "x", "http://ex.org/q": "y"}})),
            ErrorKind::InvalidValueObject
        );
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@value": "x", "@language": "en", "@type": "http://ex.org/T"}})),
            ErrorKind::InvalidValueObject
        );
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@value": 5, "@language": "en"}})),
            ErrorKind::InvalidLanguageTaggedValue
        );
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@value": "5", "@type": "int"}})),
            ErrorKind::InvalidTypedValue
        );
    }

    #[test]
    fn test_keyword_value_errors() {
        assert_eq!(kind(json!({"@id": 5})), ErrorKind::InvalidIdValue);
        assert_eq!(kind(json!({"@type": [1]})), ErrorKind::InvalidTypeValue);
        assert_eq!(kind(json!({"@type": {}})), ErrorKind::InvalidTypeValue);
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@value": "x", "@language": 3}})),
            ErrorKind::InvalidLanguageTaggedString
        );
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@value": "x", "@index": 3}})),
            ErrorKind::InvalidIndexValue
        );
        assert_eq!(kind(json!({"@reverse": "x"})), ErrorKind::InvalidReverseValue);
        assert_eq!(
            kind(json!({"@reverse": {"@id": "http://ex.org/a"}})),
            ErrorKind::InvalidReversePropertyMap
        );
    }

    #[test]
    fn test_colliding_keywords() {
        let doc = json!({
            "@context": {"id": "@id"},
            "@id": "http://ex.org/a",
            "id": "http://ex.org/b"
        });
        assert_eq!(kind(doc), ErrorKind::CollidingKeywords);

        let doc = json!({
            "@context": {"rev": "@reverse"},
            "@id": "http://ex.org/a",
            "@reverse": {"http://ex.org/p": {"@id": "http://ex.org/b"}},
            "rev": {"http://ex.org/q": {"@id": "http://ex.org/c"}}
        });
        assert_eq!(kind(doc), ErrorKind::CollidingKeywords);
    }

    #[test]
    fn test_reverse_keyword_alongside_reverse_term() {
        let doc = json!({
            "@context": {"children": {"@reverse": "http://ex.org/parent"}},
            "@id": "http://ex.org/a",
            "@reverse": {"http://ex.org/knows": {"@id": "http://ex.org/b"}},
            "children": {"@id": "http://ex.org/c"}
        });
        let result = expand(doc).unwrap();
        assert_eq!(
            result[0]["@reverse"],
            json!({
                "http://ex.org/knows": [{"@id": "http://ex.org/b"}],
                "http://ex.org/parent": [{"@id": "http://ex.org/c"}]
            })
        );
    }

    #[test]
    fn test_list_of_lists() {
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@list": [["a"]]}})),
            ErrorKind::ListOfLists
        );
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@list": [{"@list": ["a"]}]}})),
            ErrorKind::ListOfLists
        );
        assert_eq!(
            kind(json!({
                "@context": {"l": {"@id": "http://ex.org/l", "@container": "@list"}},
                "l": [["a"], "b"]
            })),
            ErrorKind::ListOfLists
        );
    }

    #[test]
    fn test_set_or_list_object_errors() {
        assert_eq!(
            kind(json!({"http://ex.org/p": {"@set": ["a"], "@id": "http://ex.org/x"}})),
            ErrorKind::InvalidSetOrListObject
        );
        assert_eq!(
            kind(json!({
                "@id": "http://ex.org/a",
                "http://ex.org/p": {"@set": ["a"], "@list": ["b"]}
            })),
            ErrorKind::InvalidSetOrListObject
        );
        let ok = expand(json!({
            "http://ex.org/p": {"@list": ["a"], "@index": "i"}
        }))
        .unwrap();
        assert_eq!(
            ok[0]["http://ex.org/p"],
            json!([{"@list": [{"@value": "a"}], "@index": "i"}])
        );
    }

    #[test]
    fn test_free_floating_list_dropped() {
        assert_eq!(expand(json!({"@list": ["a"]})).unwrap(), json!([]));
    }

    #[test]
    fn test_index_container() {
        let doc = json!({
            "@context": {
                "@vocab": "http://ex.org/",
                "post": {"@container": "@index"}
            },
            "@id": "http://ex.org/blog",
            "post": {
                "en": {"@id": "http://ex.org/post/1", "title": "Hello"},
                "de": [{"@id": "http://ex.org/post/2", "@index": "own"}, "text"]
            }
        });
        let result = expand(doc).unwrap();
        assert_eq!(
            result[0]["http://ex.org/post"],
            json!([
                {"@id": "http://ex.org/post/2", "@index": "own"},
                {"@value": "text", "@index": "de"},
                {"@id": "http://ex.org/post/1", "http://ex.org/title": [{"@value": "Hello"}], "@index": "en"}
            ])
        );
    }

    #[test]
    fn test_language_map_errors() {
        let doc = json!({
            "@context": {"label": {"@id": "http://ex.org/label", "@container": "@language"}},
            "@id": "http://ex.org/a",
            "label": {"en": 5}
        });
        assert_eq!(kind(doc), ErrorKind::InvalidLanguageMapValue);
    }

    #[test]
    fn test_reverse_keyword() {
        let doc = json!({
            "@context": {"likedBy": {"@reverse": "http://ex.org/likes"}},
            "@id": "http://ex.org/bob",
            "@reverse": {
                "http://ex.org/knows": [{"@id": "http://ex.org/ann"}],
                "likedBy": {"@id": "http://ex.org/cat"}
            }
        });
        let result = expand(doc).unwrap();
        assert_eq!(
            result,
            json!([{
                "@id": "http://ex.org/bob",
                "@reverse": {"http://ex.org/knows": [{"@id": "http://ex.org/ann"}]},
                "http://ex.org/likes": [{"@id": "http://ex.org/cat"}]
            }])
        );
    }

    #[test]
    fn test_reverse_values_rejected() {
        assert_eq!(
            kind(json!({
                "@id": "http://ex.org/bob",
                "@reverse": {"http://ex.org/knows": "literal"}
            })),
            ErrorKind::InvalidReversePropertyValue
        );
        assert_eq!(
            kind(json!({
                "@context": {"children": {"@reverse": "http://ex.org/parent"}},
                "@id": "http://ex.org/bob",
                "children": {"@list": [{"@id": "http://ex.org/x"}]}
            })),
            ErrorKind::InvalidReversePropertyValue
        );
    }

    #[test]
    fn test_with_active_property_not_wrapped() {
        let processor = JsonLdProcessor::default();
        let ctx = processor
            .process_context(&processor.initial_context(), &json!({"@vocab": "http://ex.org/"}))
            .unwrap();
        let out = processor
            .expand_with_context(&json!("x"), Some(&ctx), Some("name"))
            .unwrap();
        assert_eq!(out, json!({"@value": "x"}));
    }
}
