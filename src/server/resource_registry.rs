//! Resource registry for managing resource descriptors and generating CRUD routes

use super::handlers;
use crate::core::controller::ResourceController;
use crate::core::store::EntityStore;
use axum::Router;
use axum::routing::get;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Trait that describes how to build routes for a resource
pub trait ResourceDescriptor: Send + Sync {
    /// Route segment (e.g., "posts")
    fn name(&self) -> &str;

    /// Build the routes for this resource
    ///
    /// - GET|POST /{name}
    /// - GET /{name}/create
    /// - GET|PUT|PATCH|DELETE /{name}/{id}
    /// - GET /{name}/{id}/edit
    fn build_routes(&self) -> Router;
}

impl<S: EntityStore + 'static> ResourceDescriptor for Arc<ResourceController<S>> {
    fn name(&self) -> &str {
        ResourceController::name(self)
    }

    fn build_routes(&self) -> Router {
        let base = format!("/{}", ResourceController::name(self));

        Router::new()
            .route(
                &base,
                get(handlers::list::<S>).post(handlers::create::<S>),
            )
            .route(&format!("{base}/create"), get(handlers::create_form::<S>))
            .route(
                &format!("{base}/{{id}}"),
                get(handlers::fetch::<S>)
                    .put(handlers::update::<S>)
                    .patch(handlers::update::<S>)
                    .delete(handlers::delete::<S>),
            )
            .route(&format!("{base}/{{id}}/edit"), get(handlers::edit_form::<S>))
            .with_state(self.clone())
    }
}

/// Registry for all resources in the application
#[derive(Default)]
pub struct ResourceRegistry {
    descriptors: BTreeMap<String, Box<dyn ResourceDescriptor>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource descriptor
    ///
    /// A descriptor with the same name replaces the previous one.
    pub fn register(&mut self, descriptor: Box<dyn ResourceDescriptor>) {
        let name = descriptor.name().to_string();
        if self.descriptors.insert(name.clone(), descriptor).is_some() {
            tracing::warn!(resource = %name, "resource registered twice, keeping the last one");
        }
    }

    /// Build a router with all registered resource routes
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered resource names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDescriptor(&'static str);

    impl ResourceDescriptor for MockDescriptor {
        fn name(&self) -> &str {
            self.0
        }

        fn build_routes(&self) -> Router {
            Router::new()
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        assert!(ResourceRegistry::new().names().is_empty());
    }

    #[test]
    fn test_register_sorted_and_replaced() {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(MockDescriptor("users")));
        registry.register(Box::new(MockDescriptor("posts")));
        registry.register(Box::new(MockDescriptor("posts")));

        assert_eq!(registry.names(), vec!["posts", "users"]);
        let _router = registry.build_routes();
    }
}
