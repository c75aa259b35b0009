//! Transformer contract
//!
//! One transformer is bound per resource type. It turns an entity into the
//! attributes that go on the wire and declares which relations can be
//! embedded next to them.

use super::entity::AttributeMap;
use super::resource::Resource;

/// Converts entities of type `E` to wire attributes
///
/// `transform` must be pure: the same entity always yields the same map.
/// `default_includes` should be a subset of `available_includes`; the
/// serializer only embeds relations that are available, so a default that is
/// not also available is ignored.
///
/// # Example
///
/// ```rust,ignore
/// struct PostTransformer;
///
/// impl Transformer<Post> for PostTransformer {
///     fn transform(&self, post: &Post) -> AttributeMap {
///         let mut map = AttributeMap::new();
///         map.insert("id".into(), json!(post.id));
///         map.insert("title".into(), json!(post.title));
///         map
///     }
///
///     fn available_includes(&self) -> &[&str] {
///         &["author", "comments"]
///     }
///
///     fn include(&self, post: &Post, relation: &str) -> Option<Resource> {
///         match relation {
///             "author" => Some(Item::new(post.author.clone(), Arc::new(UserTransformer)).into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Transformer<E>: Send + Sync {
    /// Attributes for one entity
    fn transform(&self, entity: &E) -> AttributeMap;

    /// Relations a client may ask for
    fn available_includes(&self) -> &[&str] {
        &[]
    }

    /// Relations embedded even when not requested
    fn default_includes(&self) -> &[&str] {
        &[]
    }

    /// Resolve one relation of `entity` as a sub-resource
    ///
    /// Returning `None` skips the relation entirely; returning
    /// [`Resource::Null`] embeds an explicit `null`.
    fn include(&self, _entity: &E, _relation: &str) -> Option<Resource> {
        None
    }
}

/// Transformer that exposes a fixed list of attributes read from the entity
///
/// Handy for resources without relations.
#[derive(Debug, Clone)]
pub struct FieldsTransformer {
    fields: Vec<String>,
}

impl FieldsTransformer {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl<E: super::entity::Entity> Transformer<E> for FieldsTransformer {
    fn transform(&self, entity: &E) -> AttributeMap {
        self.fields
            .iter()
            .map(|field| {
                let value = entity.attribute(field).unwrap_or(serde_json::Value::Null);
                (field.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use serde_json::{Value, json};

    #[derive(Clone)]
    struct Note {
        id: u32,
        body: String,
    }

    impl Entity for Note {
        fn id(&self) -> String {
            self.id.to_string()
        }

        fn attribute(&self, field: &str) -> Option<Value> {
            match field {
                "id" => Some(json!(self.id)),
                "body" => Some(json!(self.body)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_fields_transformer_reads_listed_fields() {
        let transformer = FieldsTransformer::new(["id", "body", "missing"]);
        let note = Note {
            id: 3,
            body: "hello".to_string(),
        };

        let map = Transformer::<Note>::transform(&transformer, &note);
        assert_eq!(map.get("id"), Some(&json!(3)));
        assert_eq!(map.get("body"), Some(&json!("hello")));
        assert_eq!(map.get("missing"), Some(&Value::Null));
        assert!(Transformer::<Note>::available_includes(&transformer).is_empty());
    }
}
