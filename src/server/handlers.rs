//! HTTP handlers for resource operations
//!
//! Handlers are generic over the entity store and only translate between
//! axum extractors and [`ResourceController`] calls.

use crate::core::controller::{RequestParams, ResourceController};
use crate::core::response::ApiResult;
use crate::core::store::EntityStore;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use serde_json::Value;
use std::sync::Arc;

/// Query pairs as sent; unknown keys are ignored later
type RawQuery = Query<Vec<(String, String)>>;

/// Decode a request body; anything that is not JSON counts as no data
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

fn params(Query(pairs): RawQuery) -> RequestParams {
    RequestParams::from_pairs(pairs)
}

pub async fn list<S: EntityStore + 'static>(
    State(controller): State<Arc<ResourceController<S>>>,
    query: RawQuery,
) -> ApiResult {
    controller.list(&params(query)).await
}

pub async fn create<S: EntityStore + 'static>(
    State(controller): State<Arc<ResourceController<S>>>,
    query: RawQuery,
    body: Bytes,
) -> ApiResult {
    controller.create(&params(query), &parse_body(&body)).await
}

pub async fn fetch<S: EntityStore + 'static>(
    State(controller): State<Arc<ResourceController<S>>>,
    Path(id): Path<String>,
    query: RawQuery,
) -> ApiResult {
    controller.fetch(&id, &params(query)).await
}

pub async fn update<S: EntityStore + 'static>(
    State(controller): State<Arc<ResourceController<S>>>,
    Path(id): Path<String>,
    query: RawQuery,
    body: Bytes,
) -> ApiResult {
    controller
        .update(&id, &params(query), &parse_body(&body))
        .await
}

pub async fn delete<S: EntityStore + 'static>(
    State(controller): State<Arc<ResourceController<S>>>,
    Path(id): Path<String>,
    query: RawQuery,
) -> ApiResult {
    controller.delete(&id, &params(query)).await
}

pub async fn create_form<S: EntityStore + 'static>(
    State(controller): State<Arc<ResourceController<S>>>,
) -> ApiResult {
    controller.create_form().await
}

pub async fn edit_form<S: EntityStore + 'static>(
    State(controller): State<Arc<ResourceController<S>>>,
    Path(id): Path<String>,
) -> ApiResult {
    controller.edit_form(&id).await
}
