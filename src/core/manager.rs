//! Serialization manager
//!
//! Turns a [`Resource`] into the response envelope:
//!
//! ```json
//! {
//!   "<resource key>": { ...attributes, "<relation>": { "data": ... } },
//!   "meta": {
//!     "available_includes": ["author", "comments"],
//!     "default_includes": ["author"],
//!     "pagination": { "current": 20, "next": 30, "count": 10 }
//!   }
//! }
//! ```
//!
//! Embedded relations are serialized with the same rules, using the
//! relation's own transformer and key. They only carry a `meta` object when
//! the sub-resource has meta values or a cursor of its own.

use super::entity::AttributeMap;
use super::includes::{DEFAULT_RECURSION_LIMIT, Includes};
use super::resource::{Collection, Cursor, IncludeSets, Item, Resource};
use serde_json::{Value, json};

/// Key used when a resource was built without one
pub const DEFAULT_RESOURCE_KEY: &str = "data";

/// Drives transformers over a resource tree
#[derive(Debug, Clone, Copy)]
pub struct Manager {
    recursion_limit: usize,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    pub fn new() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Maximum depth of embedded relations, requested or default
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Serialize a root resource into the full envelope
    ///
    /// `meta.available_includes` and `meta.default_includes` are always
    /// present, whatever was requested.
    pub fn create_data(&self, resource: &Resource, requested: &Includes) -> Value {
        let requested = requested.clone().with_recursion_limit(self.recursion_limit);
        let includes = resource.includes().cloned().unwrap_or_default();

        let (key, data, mut meta, cursor) = match resource {
            Resource::Item(item) => (
                item.key(),
                self.item_data(item, &requested, 1),
                item.meta().clone(),
                None,
            ),
            Resource::Collection(collection) => (
                collection.key(),
                self.collection_data(collection, &requested, 1),
                collection.meta().clone(),
                collection.cursor(),
            ),
            Resource::Null => (None, Value::Null, AttributeMap::new(), None),
        };

        meta.insert("available_includes".to_string(), json!(includes.available));
        meta.insert("default_includes".to_string(), json!(includes.default));
        if let Some(cursor) = cursor {
            meta.insert("pagination".to_string(), json!(cursor));
        }

        envelope(key, data, Some(meta))
    }

    fn nested(&self, resource: &Resource, requested: &Includes, depth: usize) -> Value {
        match resource {
            Resource::Null => Value::Null,
            Resource::Item(item) => {
                let data = self.item_data(item, requested, depth);
                envelope(item.key(), data, sub_meta(item.meta(), None))
            }
            Resource::Collection(collection) => {
                let data = self.collection_data(collection, requested, depth);
                envelope(
                    collection.key(),
                    data,
                    sub_meta(collection.meta(), collection.cursor()),
                )
            }
        }
    }

    fn item_data(&self, item: &Item, requested: &Includes, depth: usize) -> Value {
        let attributes = item.transform();
        let embedded = self.embed(attributes, item.includes(), requested, depth, |relation| {
            item.include(relation)
        });
        Value::Object(embedded)
    }

    fn collection_data(&self, collection: &Collection, requested: &Includes, depth: usize) -> Value {
        let items = collection
            .entries()
            .map(|entry| {
                let attributes = entry.transform();
                let embedded =
                    self.embed(attributes, collection.includes(), requested, depth, |relation| {
                        entry.include(relation)
                    });
                Value::Object(embedded)
            })
            .collect();

        Value::Array(items)
    }

    /// Add (default ∪ requested) ∩ available relations to one entity's attributes
    fn embed<F>(
        &self,
        mut attributes: AttributeMap,
        includes: &IncludeSets,
        requested: &Includes,
        depth: usize,
        resolve: F,
    ) -> AttributeMap
    where
        F: Fn(&str) -> Option<Resource>,
    {
        if depth > self.recursion_limit {
            return attributes;
        }

        let top_level = requested.top_level();
        for relation in includes.resolve(&top_level) {
            let Some(sub_resource) = resolve(relation) else {
                continue;
            };
            let children = requested.children(relation);
            let value = self.nested(&sub_resource, &children, depth + 1);
            attributes.insert(relation.to_string(), value);
        }

        attributes
    }
}

fn envelope(key: Option<&str>, data: Value, meta: Option<AttributeMap>) -> Value {
    let mut out = AttributeMap::new();
    out.insert(key.unwrap_or(DEFAULT_RESOURCE_KEY).to_string(), data);
    if let Some(meta) = meta {
        out.insert("meta".to_string(), Value::Object(meta));
    }
    Value::Object(out)
}

fn sub_meta(meta: &AttributeMap, cursor: Option<&Cursor>) -> Option<AttributeMap> {
    if meta.is_empty() && cursor.is_none() {
        return None;
    }
    let mut meta = meta.clone();
    if let Some(cursor) = cursor {
        meta.insert("pagination".to_string(), json!(cursor));
    }
    Some(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transformer::Transformer;
    use std::sync::Arc;

    #[derive(Clone)]
    struct User {
        id: u32,
        name: &'static str,
    }

    #[derive(Clone)]
    struct Comment {
        id: u32,
        body: &'static str,
    }

    #[derive(Clone)]
    struct Post {
        id: u32,
        title: &'static str,
        author: Option<User>,
        comments: Vec<Comment>,
    }

    struct UserTransformer;

    impl Transformer<User> for UserTransformer {
        fn transform(&self, user: &User) -> AttributeMap {
            let mut map = AttributeMap::new();
            map.insert("id".into(), json!(user.id));
            map.insert("name".into(), json!(user.name));
            map
        }
    }

    struct CommentTransformer;

    impl Transformer<Comment> for CommentTransformer {
        fn transform(&self, comment: &Comment) -> AttributeMap {
            let mut map = AttributeMap::new();
            map.insert("id".into(), json!(comment.id));
            map.insert("body".into(), json!(comment.body));
            map
        }
    }

    struct PostTransformer;

    impl Transformer<Post> for PostTransformer {
        fn transform(&self, post: &Post) -> AttributeMap {
            let mut map = AttributeMap::new();
            map.insert("id".into(), json!(post.id));
            map.insert("title".into(), json!(post.title));
            map
        }

        fn available_includes(&self) -> &[&str] {
            &["author", "comments"]
        }

        fn default_includes(&self) -> &[&str] {
            &["author"]
        }

        fn include(&self, post: &Post, relation: &str) -> Option<Resource> {
            match relation {
                "author" => Some(match &post.author {
                    Some(author) => Item::new(author.clone(), Arc::new(UserTransformer)).into(),
                    None => Resource::Null,
                }),
                "comments" => Some(
                    Collection::new(post.comments.clone(), Arc::new(CommentTransformer)).into(),
                ),
                _ => None,
            }
        }
    }

    fn post() -> Post {
        Post {
            id: 1,
            title: "Hello",
            author: Some(User { id: 9, name: "ada" }),
            comments: vec![
                Comment { id: 1, body: "first" },
                Comment { id: 2, body: "second" },
            ],
        }
    }

    #[test]
    fn test_item_embeds_default_and_requested_includes() {
        let item = Item::new(post(), Arc::new(PostTransformer)).with_key("post");
        let envelope = Manager::new().create_data(&Resource::from(item), &Includes::parse("comments"));

        assert_eq!(envelope["post"]["title"], "Hello");
        assert_eq!(envelope["post"]["author"]["data"]["name"], "ada");
        assert_eq!(envelope["post"]["comments"]["data"][1]["body"], "second");
        assert_eq!(
            envelope["meta"]["available_includes"],
            json!(["author", "comments"])
        );
        assert_eq!(envelope["meta"]["default_includes"], json!(["author"]));
        assert!(envelope["meta"].get("pagination").is_none());
    }

    #[test]
    fn test_unavailable_include_is_skipped() {
        let item = Item::new(post(), Arc::new(PostTransformer));
        let envelope = Manager::new().create_data(&Resource::from(item), &Includes::parse("secrets"));

        assert!(envelope["data"].get("secrets").is_none());
        assert!(envelope["data"].get("comments").is_none());
        assert!(envelope["data"].get("author").is_some());
    }

    #[test]
    fn test_null_relation_serializes_to_null() {
        let mut lonely = post();
        lonely.author = None;
        let item = Item::new(lonely, Arc::new(PostTransformer));
        let envelope = Manager::new().create_data(&Resource::from(item), &Includes::default());

        assert_eq!(envelope["data"]["author"], Value::Null);
    }

    #[test]
    fn test_empty_collection_keeps_meta() {
        let collection = Collection::new(Vec::<Post>::new(), Arc::new(PostTransformer))
            .with_key("posts")
            .with_cursor(Cursor::new(0, 10, 0));
        let envelope = Manager::new().create_data(&Resource::from(collection), &Includes::default());

        assert_eq!(envelope["posts"], json!([]));
        assert_eq!(
            envelope["meta"]["pagination"],
            json!({"current": 0, "next": 10, "count": 0})
        );
        assert_eq!(
            envelope["meta"]["available_includes"],
            json!(["author", "comments"])
        );
    }

    #[test]
    fn test_cursor_count_capped_to_items() {
        let collection = Collection::new(vec![post()], Arc::new(PostTransformer))
            .with_cursor(Cursor::new(20, 10, 10));
        assert_eq!(collection.cursor().map(|c| c.count), Some(1));
    }

    #[test]
    fn test_custom_meta_is_merged() {
        let item = Item::new(post(), Arc::new(PostTransformer)).with_meta("version", json!(2));
        let envelope = Manager::new().create_data(&Resource::from(item), &Includes::default());

        assert_eq!(envelope["meta"]["version"], 2);
        assert!(envelope["meta"]["available_includes"].is_array());
    }

    #[test]
    fn test_recursion_limit_stops_embedding() {
        let item = Item::new(post(), Arc::new(PostTransformer));
        let envelope = Manager::new()
            .with_recursion_limit(0)
            .create_data(&Resource::from(item), &Includes::parse("comments"));

        assert!(envelope["data"].get("author").is_none());
        assert!(envelope["data"].get("comments").is_none());
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let manager = Manager::new();
        let includes = Includes::parse("comments");
        let render = || {
            let item = Item::new(post(), Arc::new(PostTransformer));
            manager.create_data(&Resource::from(item), &includes)
        };
        let first = render();
        let second = render();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
