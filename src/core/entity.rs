//! Entity trait: the minimum the resource layer needs to know about a record

use serde_json::{Map, Value};

/// Attribute mapping produced by transformers and accepted by stores
pub type AttributeMap = Map<String, Value>;

/// A domain record handled by an [`EntityStore`](crate::core::store::EntityStore)
///
/// The resource layer never looks inside an entity beyond its identifier; the
/// attributes that reach the wire are whatever the bound
/// [`Transformer`](crate::core::transformer::Transformer) produces.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identifier used in URLs and passed to update rules
    fn id(&self) -> String;

    /// Read a stored attribute by name
    ///
    /// Used for alternate-field lookups (`use_as_id`). Returns `None` for
    /// unknown or unset fields.
    fn attribute(&self, field: &str) -> Option<Value>;
}
