//! Schemaless record type and a transformer for it

use crate::core::entity::{AttributeMap, Entity};
use crate::core::resource::{Collection, Item, Resource};
use crate::core::transformer::Transformer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Related data attached to a [`Record`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related {
    One(Box<Record>),
    Many(Vec<Record>),
    /// Relation is known but empty (e.g., a post without an author)
    Empty,
}

/// A record with an auto-increment identifier, attributes and relations
///
/// `id` is 0 until the record has been stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(default)]
    attributes: AttributeMap,
    #[serde(default)]
    relations: BTreeMap<String, Related>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn with_attribute(mut self, field: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(field.into(), value);
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn with_one(mut self, relation: impl Into<String>, record: Record) -> Self {
        self.relations
            .insert(relation.into(), Related::One(Box::new(record)));
        self
    }

    pub fn with_many(mut self, relation: impl Into<String>, records: Vec<Record>) -> Self {
        self.relations.insert(relation.into(), Related::Many(records));
        self
    }

    pub fn with_empty(mut self, relation: impl Into<String>) -> Self {
        self.relations.insert(relation.into(), Related::Empty);
        self
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Overwrite the given attributes, keeping the others
    pub fn merge(&mut self, attributes: AttributeMap) {
        self.attributes.extend(attributes);
    }

    pub fn related(&self, relation: &str) -> Option<&Related> {
        self.relations.get(relation)
    }

    /// Whether `field` is the identifier or a set attribute
    pub fn has_field(&self, field: &str) -> bool {
        field == "id" || self.attributes.contains_key(field)
    }
}

impl Entity for Record {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn attribute(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            _ => self.attributes.get(field).cloned(),
        }
    }
}

struct RelationDef {
    name: &'static str,
    key: String,
    transformer: Arc<dyn Transformer<Record>>,
}

/// Transformer exposing selected [`Record`] fields and its relations
///
/// ```rust,ignore
/// let users = Arc::new(RecordTransformer::new(["id", "name"]));
/// let posts = RecordTransformer::new(["id", "title"])
///     .with_relation("author", users, true);
/// ```
pub struct RecordTransformer {
    fields: Vec<String>,
    relations: Vec<RelationDef>,
    available: Vec<&'static str>,
    defaults: Vec<&'static str>,
}

impl RecordTransformer {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            relations: Vec::new(),
            available: Vec::new(),
            defaults: Vec::new(),
        }
    }

    /// Expose `name` as an include rendered by `transformer`
    ///
    /// Default relations are embedded even when not requested.
    pub fn with_relation(
        self,
        name: &'static str,
        transformer: Arc<dyn Transformer<Record>>,
        default: bool,
    ) -> Self {
        self.with_keyed_relation(name, "data", transformer, default)
    }

    /// Like [`with_relation`](Self::with_relation), wrapping the sub-resource under `key`
    pub fn with_keyed_relation(
        mut self,
        name: &'static str,
        key: impl Into<String>,
        transformer: Arc<dyn Transformer<Record>>,
        default: bool,
    ) -> Self {
        self.relations.push(RelationDef {
            name,
            key: key.into(),
            transformer,
        });
        self.available.push(name);
        if default {
            self.defaults.push(name);
        }
        self
    }
}

impl Transformer<Record> for RecordTransformer {
    fn transform(&self, record: &Record) -> AttributeMap {
        self.fields
            .iter()
            .map(|field| {
                let value = record.attribute(field).unwrap_or(Value::Null);
                (field.clone(), value)
            })
            .collect()
    }

    fn available_includes(&self) -> &[&str] {
        &self.available
    }

    fn default_includes(&self) -> &[&str] {
        &self.defaults
    }

    fn include(&self, record: &Record, relation: &str) -> Option<Resource> {
        let def = self.relations.iter().find(|r| r.name == relation)?;

        let resource = match record.related(relation) {
            Some(Related::One(related)) => {
                Item::new(related.as_ref().clone(), def.transformer.clone())
                    .with_key(def.key.as_str())
                    .into()
            }
            Some(Related::Many(related)) => {
                Collection::new(related.iter().cloned(), def.transformer.clone())
                    .with_key(def.key.as_str())
                    .into()
            }
            Some(Related::Empty) | None => Resource::Null,
        };
        Some(resource)
    }
}
