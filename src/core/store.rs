//! Entity store trait and its inputs
//!
//! The resource layer does not run queries. It asks an [`EntityStore`] for
//! entities, passing the relations the client asked for as eager-load hints,
//! and hands mutations over together with the allow-listed field set.

use super::entity::{AttributeMap, Entity};
use super::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Offset window of a paginated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: usize,
    pub limit: usize,
}

/// Fields a client is allowed to set through create/update
///
/// Attributes outside the set are dropped before they reach the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fillable(Vec<String>);

impl Fillable {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, field: &str) -> bool {
        self.0.iter().any(|f| f == field)
    }

    /// Keep only allow-listed attributes
    pub fn filter(&self, attributes: &AttributeMap) -> AttributeMap {
        attributes
            .iter()
            .filter(|(field, _)| self.allows(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Entity access for one resource type
///
/// Implementations own persistence; the framework is agnostic to the storage
/// mechanism. `eager_load` lists the relations the response will need.
#[async_trait]
pub trait EntityStore: Send + Sync {
    type Entity: Entity;

    /// List entities, bounded by `window` when given
    async fn list(
        &self,
        eager_load: &[String],
        window: Option<Window>,
    ) -> Result<Vec<Self::Entity>, StoreError>;

    /// Total number of entities
    async fn count(&self) -> Result<usize, StoreError>;

    /// Find an entity by identifier
    async fn find(
        &self,
        id: &str,
        eager_load: &[String],
    ) -> Result<Option<Self::Entity>, StoreError>;

    /// Find the first entity whose `field` equals `value`
    async fn find_by(
        &self,
        field: &str,
        value: &str,
        eager_load: &[String],
    ) -> Result<Option<Self::Entity>, StoreError>;

    /// Persist a new entity from allow-listed attributes
    async fn create(
        &self,
        attributes: AttributeMap,
        fillable: &Fillable,
    ) -> Result<Self::Entity, StoreError>;

    /// Merge allow-listed attributes into `entity` and persist it
    async fn update(
        &self,
        entity: Self::Entity,
        attributes: AttributeMap,
        fillable: &Fillable,
    ) -> Result<Self::Entity, StoreError>;

    /// Remove an entity
    async fn delete(&self, entity: Self::Entity) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fillable_filters_attributes() {
        let fillable = Fillable::new(["title", "body"]);
        let mut attributes = AttributeMap::new();
        attributes.insert("title".into(), json!("Hello"));
        attributes.insert("is_admin".into(), json!(true));

        let filtered = fillable.filter(&attributes);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get("title"), Some(&json!("Hello")));
        assert!(!fillable.allows("is_admin"));
    }

    #[test]
    fn test_empty_fillable_allows_nothing() {
        let fillable = Fillable::default();
        let mut attributes = AttributeMap::new();
        attributes.insert("title".into(), json!("Hello"));

        assert!(fillable.is_empty());
        assert!(fillable.filter(&attributes).is_empty());
    }
}
