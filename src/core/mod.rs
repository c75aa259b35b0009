//! Core module containing the resource layer's traits and types

pub mod controller;
pub mod entity;
pub mod error;
pub mod includes;
pub mod limit;
pub mod manager;
pub mod resource;
pub mod response;
pub mod store;
pub mod transformer;
pub mod validation;

pub use controller::{Lookup, RequestContext, RequestParams, ResourceController};
pub use entity::{AttributeMap, Entity};
pub use error::{ApiError, ConfigError, StoreError};
pub use includes::Includes;
pub use limit::LimitPolicy;
pub use manager::Manager;
pub use resource::{Collection, Cursor, Item, Resource};
pub use response::{ApiResponse, ApiResult};
pub use store::{EntityStore, Fillable, Window};
pub use transformer::{FieldsTransformer, Transformer};
pub use validation::{ResourceRules, Rule, RuleValidator, Rules, StaticRules, Validator};
