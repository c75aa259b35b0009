//! # API Skeleton
//!
//! A generic REST resource layer for building JSON APIs in Rust.
//!
//! ## Features
//!
//! - **Generic Controller**: list, fetch, create, update and delete for any entity store
//! - **Transformers**: control exactly which attributes and relations reach the wire
//! - **Includes**: `?include=author,comments.author` with default and available sets
//! - **Pagination**: `skip`/`limit` with configurable default and maximum page sizes
//! - **Validation**: declarative per-field rules with per-field error messages
//! - **Configuration-Based**: resources declared in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skeleton::prelude::*;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let posts = ResourceConfig::new("posts")
//!     .with_limits(Some(10), Some(50))
//!     .with_fillable(["title", "body"]);
//!
//! ServerBuilder::new()
//!     .register(ResourceController::new(posts, store, FieldsTransformer::new(["id", "title"])))
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{AttributeMap, Entity},
        store::{EntityStore, Fillable, Window},
        transformer::{FieldsTransformer, Transformer},
        validation::{ResourceRules, Rule, RuleValidator, Rules, StaticRules, Validator},
    };

    // === Resources & Serialization ===
    pub use crate::core::{
        includes::Includes,
        limit::LimitPolicy,
        manager::Manager,
        resource::{Collection, Cursor, Item, Resource},
    };

    // === Controller ===
    pub use crate::core::{
        controller::{RequestContext, RequestParams, ResourceController},
        error::{ApiError, StoreError},
        response::{ApiResponse, ApiResult},
    };

    // === Storage ===
    pub use crate::storage::{InMemoryStore, Record, RecordTransformer, Related};

    // === Config ===
    pub use crate::config::{ApiConfig, ResourceConfig};

    // === Server ===
    pub use crate::server::{ResourceDescriptor, ResourceRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
