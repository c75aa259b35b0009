//! Resource wrappers: an item or a collection bound to its transformer
//!
//! Wrappers are built per response and consumed by the
//! [`Manager`](crate::core::manager::Manager). The entity type is erased at
//! construction so that nested relations of different types can live in the
//! same tree.

use super::entity::AttributeMap;
use super::transformer::Transformer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Pagination window of a collection page
///
/// `count` is the number of items in this page, not the size of the whole
/// data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Offset that was requested
    pub current: usize,

    /// Offset to request for the following page
    pub next: usize,

    /// Items present in this page
    pub count: usize,
}

impl Cursor {
    /// Cursor for a page starting at `skip` with page size `limit`
    pub fn new(skip: usize, limit: usize, count: usize) -> Self {
        Self {
            current: skip,
            next: skip.saturating_add(limit),
            count,
        }
    }
}

/// An entity paired with the transformer that knows how to render it
trait Bound: Send + Sync {
    fn transform(&self) -> AttributeMap;
    fn include(&self, relation: &str) -> Option<Resource>;
}

struct Binding<E, T: ?Sized> {
    entity: E,
    transformer: Arc<T>,
}

impl<E, T> Bound for Binding<E, T>
where
    E: Send + Sync,
    T: Transformer<E> + ?Sized,
{
    fn transform(&self) -> AttributeMap {
        self.transformer.transform(&self.entity)
    }

    fn include(&self, relation: &str) -> Option<Resource> {
        self.transformer.include(&self.entity, relation)
    }
}

/// Include declarations captured from the transformer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSets {
    pub available: Vec<String>,
    pub default: Vec<String>,
}

impl IncludeSets {
    fn of<E, T: Transformer<E> + ?Sized>(transformer: &T) -> Self {
        let owned =
            |names: &[&str]| -> Vec<String> { names.iter().map(|s| s.to_string()).collect() };
        Self {
            available: owned(transformer.available_includes()),
            default: owned(transformer.default_includes()),
        }
    }

    /// Relations to embed: defaults first, then requested ones, all filtered
    /// through the available set
    pub fn resolve<'a>(&'a self, requested: &[&'a str]) -> Vec<&'a str> {
        let mut out: Vec<&str> = Vec::new();
        let candidates = self
            .default
            .iter()
            .map(String::as_str)
            .chain(requested.iter().copied());

        for name in candidates {
            if self.available.iter().any(|a| a == name) && !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }
}

/// A single entity
pub struct Item {
    entity: Box<dyn Bound>,
    includes: IncludeSets,
    key: Option<String>,
    meta: AttributeMap,
}

impl Item {
    pub fn new<E, T>(entity: E, transformer: Arc<T>) -> Self
    where
        E: Send + Sync + 'static,
        T: Transformer<E> + ?Sized + 'static,
    {
        Self {
            includes: IncludeSets::of::<E, T>(transformer.as_ref()),
            entity: Box::new(Binding {
                entity,
                transformer,
            }),
            key: None,
            meta: AttributeMap::new(),
        }
    }

    /// Set the resource key the data is wrapped under
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set_meta(key, value);
        self
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: Value) {
        self.meta.insert(key.into(), value);
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn includes(&self) -> &IncludeSets {
        &self.includes
    }

    pub fn meta(&self) -> &AttributeMap {
        &self.meta
    }

    pub(crate) fn transform(&self) -> AttributeMap {
        self.entity.transform()
    }

    pub(crate) fn include(&self, relation: &str) -> Option<Resource> {
        self.entity.include(relation)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("key", &self.key)
            .field("includes", &self.includes)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// An ordered list of entities sharing one transformer
pub struct Collection {
    entities: Vec<Box<dyn Bound>>,
    includes: IncludeSets,
    key: Option<String>,
    cursor: Option<Cursor>,
    meta: AttributeMap,
}

impl Collection {
    pub fn new<E, T, I>(entities: I, transformer: Arc<T>) -> Self
    where
        E: Send + Sync + 'static,
        T: Transformer<E> + ?Sized + 'static,
        I: IntoIterator<Item = E>,
    {
        let includes = IncludeSets::of::<E, T>(transformer.as_ref());
        let entities = entities
            .into_iter()
            .map(|entity| {
                Box::new(Binding {
                    entity,
                    transformer: transformer.clone(),
                }) as Box<dyn Bound>
            })
            .collect();

        Self {
            entities,
            includes,
            key: None,
            cursor: None,
            meta: AttributeMap::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach a pagination cursor
    ///
    /// The cursor count is capped to the number of wrapped entities.
    pub fn with_cursor(mut self, mut cursor: Cursor) -> Self {
        cursor.count = cursor.count.min(self.entities.len());
        self.cursor = Some(cursor);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set_meta(key, value);
        self
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: Value) {
        self.meta.insert(key.into(), value);
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn includes(&self) -> &IncludeSets {
        &self.includes
    }

    pub fn meta(&self) -> &AttributeMap {
        &self.meta
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.entities.iter().map(|bound| Entry(bound.as_ref()))
    }
}

/// Borrowed view of one bound entity inside a collection
pub(crate) struct Entry<'a>(&'a dyn Bound);

impl Entry<'_> {
    pub(crate) fn transform(&self) -> AttributeMap {
        self.0.transform()
    }

    pub(crate) fn include(&self, relation: &str) -> Option<Resource> {
        self.0.include(relation)
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("len", &self.entities.len())
            .field("key", &self.key)
            .field("cursor", &self.cursor)
            .field("includes", &self.includes)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Anything the manager can serialize
#[derive(Debug)]
pub enum Resource {
    Item(Item),
    Collection(Collection),
    /// An absent relation, rendered as `null`
    Null,
}

impl Resource {
    pub fn includes(&self) -> Option<&IncludeSets> {
        match self {
            Resource::Item(item) => Some(item.includes()),
            Resource::Collection(collection) => Some(collection.includes()),
            Resource::Null => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Resource::Item(item) => item.key(),
            Resource::Collection(collection) => collection.key(),
            Resource::Null => None,
        }
    }
}

impl From<Item> for Resource {
    fn from(item: Item) -> Self {
        Resource::Item(item)
    }
}

impl From<Collection> for Resource {
    fn from(collection: Collection) -> Self {
        Resource::Collection(collection)
    }
}
