//! Graph indexing over expanded JSON-LD.
//!
//! Groups node objects by `@id` (and optionally by `@type`) and synthesizes
//! `@reverse` links from node references, producing a structure suited for
//! lookups by a serializer or visualizer.

use crate::bnode::BlankNodeGenerator;
use ldtr_vocab::jsonld;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use std::collections::HashSet;
use thiserror::Error;

/// Errors from [`index`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("Invalid expanded document: {0}")]
    InvalidStructure(String),
}

/// Options controlling what [`index`] computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexOptions {
    /// Add `@reverse` links to referenced nodes
    pub reverses: bool,
    /// Build the type index
    pub by_type: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            reverses: true,
            by_type: false,
        }
    }
}

impl IndexOptions {
    pub fn with_reverses(mut self, reverses: bool) -> Self {
        self.reverses = reverses;
        self
    }

    pub fn with_by_type(mut self, by_type: bool) -> Self {
        self.by_type = by_type;
        self
    }
}

/// Nodes keyed by `@id`, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphIndex {
    by_id: Map<String, JsonValue>,
    by_type: Option<Map<String, JsonValue>>,
}

impl GraphIndex {
    /// The merged node with identifier `id`
    pub fn get(&self, id: &str) -> Option<&Map<String, JsonValue>> {
        self.by_id.get(id).and_then(JsonValue::as_object)
    }

    pub fn by_id(&self) -> &Map<String, JsonValue> {
        &self.by_id
    }

    /// Type IRI to `[{"@id": ...}]`, present only when built with `by_type`
    pub fn by_type(&self) -> Option<&Map<String, JsonValue>> {
        self.by_type.as_ref()
    }

    /// Node references for every node typed `type_iri`
    pub fn nodes_of_type(&self, type_iri: &str) -> Vec<&str> {
        self.by_type
            .as_ref()
            .and_then(|types| types.get(type_iri))
            .and_then(JsonValue::as_array)
            .map(|refs| {
                refs.iter()
                    .filter_map(|r| r.get(jsonld::ID).and_then(JsonValue::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Render as a JSON-LD document whose `byId` member indexes the graph.
    pub fn to_json(&self) -> JsonValue {
        let mut result = Map::new();
        result.insert(
            jsonld::CONTEXT.to_string(),
            json!({"byId": {"@id": "@graph", "@container": "@index"}}),
        );
        result.insert("byId".to_string(), JsonValue::Object(self.by_id.clone()));
        if let Some(types) = &self.by_type {
            result.insert("byType".to_string(), JsonValue::Object(types.clone()));
        }
        JsonValue::Object(result)
    }
}

fn node_ref(id: &str) -> JsonValue {
    json!({ "@id": id })
}

/// Top-level node objects of an expanded document
fn nodes(expanded: &JsonValue) -> Result<&Vec<JsonValue>, IndexError> {
    match expanded {
        JsonValue::Array(items) => Ok(items),
        JsonValue::Object(map) => match map.get(jsonld::GRAPH) {
            Some(JsonValue::Array(items)) => Ok(items),
            _ => Err(IndexError::InvalidStructure(
                "object input must carry a @graph array".to_string(),
            )),
        },
        _ => Err(IndexError::InvalidStructure(
            "expected an array of nodes or an object with @graph".to_string(),
        )),
    }
}

/// Merge `incoming` into `existing`: arrays concatenate, anything else keeps
/// the value already there.
fn merge_node(existing: &mut Map<String, JsonValue>, incoming: Map<String, JsonValue>) {
    for (key, value) in incoming {
        match (existing.get_mut(&key), value) {
            (None, value) => {
                existing.insert(key, value);
            }
            (Some(JsonValue::Array(current)), JsonValue::Array(more)) => current.extend(more),
            (Some(_), _) => {}
        }
    }
}

/// Index an expanded document.
pub fn index(expanded: &JsonValue, options: IndexOptions) -> Result<GraphIndex, IndexError> {
    let items = nodes(expanded)?;

    let taken: HashSet<&str> = items
        .iter()
        .filter_map(|item| item.get(jsonld::ID).and_then(JsonValue::as_str))
        .collect();
    let mut blank_ids = BlankNodeGenerator::default();

    let mut by_id = Map::new();
    let mut by_type = Map::new();
    // (source, property, target) for every reference between nodes
    let mut links: Vec<(String, String, String)> = Vec::new();

    for item in items {
        let mut node = match item {
            JsonValue::Object(map) => map.clone(),
            other => {
                return Err(IndexError::InvalidStructure(format!(
                    "graph members must be node objects, found {}",
                    other
                )))
            }
        };

        let id = match node.get(jsonld::ID).and_then(JsonValue::as_str) {
            Some(id) => id.to_string(),
            None => {
                let mut id = blank_ids.next_id();
                while taken.contains(id.as_str()) {
                    id = blank_ids.next_id();
                }
                node.insert(jsonld::ID.to_string(), JsonValue::String(id.clone()));
                id
            }
        };

        if options.by_type {
            let types = match node.get(jsonld::TYPE) {
                Some(JsonValue::Array(types)) => types.iter().filter_map(JsonValue::as_str).collect(),
                Some(JsonValue::String(t)) => vec![t.as_str()],
                _ => vec![],
            };
            for type_iri in types {
                let entry = by_type
                    .entry(type_iri.to_string())
                    .or_insert_with(|| JsonValue::Array(vec![]));
                if let JsonValue::Array(refs) = entry {
                    refs.push(node_ref(&id));
                }
            }
        }

        if options.reverses {
            for (property, values) in node.iter().filter(|(k, _)| !k.starts_with('@')) {
                let values = match values {
                    JsonValue::Array(values) => values.as_slice(),
                    other => std::slice::from_ref(other),
                };
                for target in values
                    .iter()
                    .filter_map(|v| v.get(jsonld::ID).and_then(JsonValue::as_str))
                {
                    links.push((id.clone(), property.clone(), target.to_string()));
                }
            }
        }

        match by_id.get_mut(&id) {
            Some(JsonValue::Object(existing)) => merge_node(existing, node),
            _ => {
                by_id.insert(id, JsonValue::Object(node));
            }
        }
    }

    for (source, property, target) in links {
        let Some(JsonValue::Object(target)) = by_id.get_mut(&target) else {
            continue;
        };
        let reverse = target
            .entry(jsonld::REVERSE.to_string())
            .or_insert_with(|| JsonValue::Object(Map::new()));
        let JsonValue::Object(reverse) = reverse else {
            continue;
        };
        let refs = reverse
            .entry(property)
            .or_insert_with(|| JsonValue::Array(vec![]));
        if let JsonValue::Array(refs) = refs {
            let seen = refs
                .iter()
                .any(|r| r.get(jsonld::ID).and_then(JsonValue::as_str) == Some(source.as_str()));
            if !seen {
                refs.push(node_ref(&source));
            }
        }
    }

    tracing::debug!(nodes = by_id.len(), "indexed graph");

    Ok(GraphIndex {
        by_id,
        by_type: options.by_type.then_some(by_type),
    })
}
