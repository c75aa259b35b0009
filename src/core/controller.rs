//! Generic resource controller
//!
//! One [`ResourceController`] serves one resource: it resolves the query
//! parameters of a request into a [`RequestContext`], talks to the
//! [`EntityStore`], validates payloads and renders the outcome through the
//! [`Manager`].
//!
//! The controller is transport-agnostic; the axum handlers in
//! [`crate::server::handlers`] only extract parameters and bodies and
//! forward them here.

use super::entity::{AttributeMap, Entity};
use super::error::ApiError;
use super::includes::Includes;
use super::limit::coerce_count;
use super::manager::Manager;
use super::resource::{Collection, Cursor, Item, Resource};
use super::response::{ApiResponse, ApiResult};
use super::store::{EntityStore, Window};
use super::transformer::Transformer;
use super::validation::{ResourceRules, RuleValidator, Rules, Validator};
use crate::config::ResourceConfig;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Raw query parameters understood by every resource endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequestParams {
    /// Comma separated include list, dot notation for nesting
    pub include: Option<String>,
    pub skip: Option<String>,
    pub limit: Option<String>,
    /// Lookup field to use instead of the primary identifier
    pub use_as_id: Option<String>,
}

impl RequestParams {
    /// Build from decoded query pairs; the last occurrence of a key wins
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "include" => &mut params.include,
                "skip" => &mut params.skip,
                "limit" => &mut params.limit,
                "use_as_id" => &mut params.use_as_id,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        params
    }
}

/// How the `{id}` path segment is matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Primary identifier
    Id,
    /// Equality on another field
    Field(String),
}

/// Per-request state, resolved once from [`RequestParams`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Includes handed to transformers (camel-cased when configured)
    pub includes: Includes,
    /// Relation names handed to the store, as the client wrote them
    pub eager_load: Vec<String>,
    pub skip: usize,
    /// Effective page size; `None` means unlimited
    pub limit: Option<usize>,
    pub lookup: Lookup,
}

impl RequestContext {
    /// Store window for list queries; offsets only apply to bounded pages
    pub fn window(&self) -> Option<Window> {
        self.limit.map(|limit| Window {
            skip: self.skip,
            limit,
        })
    }
}

/// CRUD endpoints for one resource
pub struct ResourceController<S: EntityStore> {
    config: ResourceConfig,
    store: Arc<S>,
    transformer: Arc<dyn Transformer<S::Entity>>,
    rules: Arc<dyn ResourceRules>,
    validator: Arc<dyn Validator>,
    manager: Manager,
}

impl<S: EntityStore> ResourceController<S> {
    /// Controller without validation rules, using [`RuleValidator`]
    pub fn new<T>(config: ResourceConfig, store: Arc<S>, transformer: T) -> Self
    where
        T: Transformer<S::Entity> + 'static,
    {
        Self {
            config,
            store,
            transformer: Arc::new(transformer),
            rules: Arc::new(()),
            validator: Arc::new(RuleValidator),
            manager: Manager::new(),
        }
    }

    pub fn with_rules(mut self, rules: impl ResourceRules + 'static) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.manager = self.manager.with_recursion_limit(limit);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolve query parameters into the per-request context
    pub fn resolve(&self, params: &RequestParams) -> RequestContext {
        let requested = Includes::parse_opt(params.include.as_deref());
        let eager_load = requested.as_slice().to_vec();
        let includes = if self.config.camel_case_includes {
            requested.camel_cased()
        } else {
            requested
        };

        let lookup = match params.use_as_id.as_deref() {
            Some(field) if !field.is_empty() => Lookup::Field(field.to_string()),
            _ => Lookup::Id,
        };

        let context = RequestContext {
            includes,
            eager_load,
            skip: params.skip.as_deref().map(coerce_count).unwrap_or(0),
            limit: self.config.limits().effective(params.limit.as_deref()),
            lookup,
        };

        tracing::debug!(
            resource = %self.config.name,
            includes = ?context.includes,
            skip = context.skip,
            limit = ?context.limit,
            lookup = ?context.lookup,
            "resolved request context"
        );
        context
    }

    /// `GET /{name}`
    pub async fn list(&self, params: &RequestParams) -> ApiResult {
        let context = self.resolve(params);
        let window = context.window();

        let entities = self
            .store
            .list(&context.eager_load, window)
            .await
            .map_err(ApiError::from_store)?;

        let mut collection = Collection::new(entities, self.transformer.clone())
            .with_key(self.config.plural_key.as_str());
        if let Some(window) = window {
            let count = collection.len();
            collection = collection.with_cursor(Cursor::new(window.skip, window.limit, count));
        }

        Ok(self.render(collection.into(), &context))
    }

    /// `GET /{name}/{id}`
    pub async fn fetch(&self, id: &str, params: &RequestParams) -> ApiResult {
        let context = self.resolve(params);
        let entity = self
            .find(id, &context.lookup, &context.eager_load)
            .await?
            .ok_or_else(ApiError::not_found)?;

        Ok(self.render(self.item(entity).into(), &context))
    }

    /// `POST /{name}`
    ///
    /// The payload is read from `body[singular_key]`.
    pub async fn create(&self, params: &RequestParams, body: &Value) -> ApiResult {
        let context = self.resolve(params);
        let payload = self.payload(body)?;

        self.check(&payload, &self.rules.rules_for_create())?;

        let entity = self
            .store
            .create(self.config.fillable.filter(&payload), &self.config.fillable)
            .await
            .map_err(ApiError::from_store)?;

        tracing::info!(
            resource = %self.config.name,
            id = %entity.id(),
            "created"
        );
        Ok(self.render(self.item(entity).into(), &context))
    }

    /// `PUT|PATCH /{name}/{id}`
    pub async fn update(&self, id: &str, params: &RequestParams, body: &Value) -> ApiResult {
        let context = self.resolve(params);
        let payload = self.payload(body)?;

        let entity = self
            .find(id, &context.lookup, &[])
            .await?
            .ok_or_else(ApiError::not_found)?;

        self.check(&payload, &self.rules.rules_for_update(&entity.id()))?;

        let entity = self
            .store
            .update(
                entity,
                self.config.fillable.filter(&payload),
                &self.config.fillable,
            )
            .await
            .map_err(ApiError::from_store)?;

        tracing::info!(
            resource = %self.config.name,
            id = %entity.id(),
            "updated"
        );
        Ok(self.render(self.item(entity).into(), &context))
    }

    /// `DELETE /{name}/{id}`
    pub async fn delete(&self, id: &str, params: &RequestParams) -> ApiResult {
        let context = self.resolve(params);
        let entity = self
            .find(id, &context.lookup, &[])
            .await?
            .ok_or_else(ApiError::not_found)?;

        let entity_id = entity.id();
        self.store
            .delete(entity)
            .await
            .map_err(ApiError::from_store)?;

        tracing::info!(resource = %self.config.name, id = %entity_id, "deleted");
        Ok(ApiResponse::message("Deleted"))
    }

    /// `GET /{name}/create`
    pub async fn create_form(&self) -> ApiResult {
        Err(ApiError::not_implemented())
    }

    /// `GET /{name}/{id}/edit`
    pub async fn edit_form(&self, _id: &str) -> ApiResult {
        Err(ApiError::not_implemented())
    }

    async fn find(
        &self,
        id: &str,
        lookup: &Lookup,
        eager_load: &[String],
    ) -> Result<Option<S::Entity>, ApiError> {
        let found = match lookup {
            Lookup::Id => self.store.find(id, eager_load).await,
            Lookup::Field(field) => self.store.find_by(field, id, eager_load).await,
        };
        found.map_err(ApiError::from_store)
    }

    /// Extract the attribute object wrapped under the singular key
    ///
    /// Falsy payloads (`null`, `false`, `0`, `""`, `"0"`, `[]`, `{}`) are
    /// empty data; any other non-object is rejected as wrong arguments.
    fn payload(&self, body: &Value) -> Result<AttributeMap, ApiError> {
        match body.get(&self.config.singular_key) {
            Some(Value::Object(map)) if !map.is_empty() => Ok(map.clone()),
            Some(value) if !is_falsy(value) => Err(ApiError::wrong_arguments()),
            _ => Err(ApiError::WrongArguments("Empty data".to_string())),
        }
    }

    fn check(&self, payload: &AttributeMap, rules: &Rules) -> Result<(), ApiError> {
        self.validator.validate(payload, rules).map_err(|messages| {
            tracing::warn!(
                resource = %self.config.name,
                fields = ?messages.keys().collect::<Vec<_>>(),
                "validation failed"
            );
            ApiError::Validation(messages)
        })
    }

    fn item(&self, entity: S::Entity) -> Item {
        Item::new(entity, self.transformer.clone()).with_key(self.config.singular_key.as_str())
    }

    fn render(&self, resource: Resource, context: &RequestContext) -> ApiResponse {
        ApiResponse::ok(self.manager.create_data(&resource, &context.includes))
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
