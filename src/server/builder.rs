//! ServerBuilder for fluent API to build HTTP servers

use super::resource_registry::{ResourceDescriptor, ResourceRegistry};
use crate::config::ApiConfig;
use crate::core::controller::ResourceController;
use crate::core::error::ApiError;
use crate::core::store::EntityStore;
use anyhow::Result;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for creating HTTP servers with registered resources
///
/// # Example
///
/// ```ignore
/// let config = ApiConfig::from_yaml_file("config/api.yaml")?;
/// let posts = config.resource("posts").cloned().unwrap_or_else(|| ResourceConfig::new("posts"));
///
/// ServerBuilder::new()
///     .with_config(config)
///     .register(ResourceController::new(posts, Arc::new(store), PostTransformer))
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    registry: ResourceRegistry,
    config: ApiConfig,
    custom_routes: Vec<Router>,
    cors: Option<CorsLayer>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new(),
            config: ApiConfig::default(),
            custom_routes: Vec::new(),
            cors: None,
        }
    }

    /// Use `config` for settings shared by every registered resource
    ///
    /// Resources registered before this call keep the previous settings.
    pub fn with_config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a resource controller
    ///
    /// The controller inherits the configured recursion limit.
    pub fn register<S: EntityStore + 'static>(mut self, controller: ResourceController<S>) -> Self {
        let controller = controller.with_recursion_limit(self.config.recursion_limit);
        tracing::debug!(resource = %controller.name(), "registering resource");
        self.registry.register(Box::new(Arc::new(controller)));
        self
    }

    /// Register a custom descriptor
    pub fn register_descriptor(mut self, descriptor: impl ResourceDescriptor + 'static) -> Self {
        self.registry.register(Box::new(descriptor));
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for endpoints that don't fit the resource pattern, such as
    /// authentication or webhooks.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Apply a CORS policy to every route (e.g., `CorsLayer::permissive()`)
    pub fn with_cors(mut self, cors: CorsLayer) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Names of the registered resources
    pub fn resources(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Build the final router
    ///
    /// This generates:
    /// - Health routes (`/health`, `/healthz`)
    /// - Routes for every registered resource
    /// - Custom routes
    ///
    /// Unknown paths and methods answer with the JSON error envelope.
    pub fn build(self) -> Router {
        let mut app = health_routes().merge(self.registry.build_routes());

        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        app = app
            .fallback(|| async { ApiError::not_found() })
            .method_not_allowed_fallback(method_not_allowed);

        if let Some(cors) = self.cors {
            app = app.layer(cors);
        }

        app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    let status = StatusCode::METHOD_NOT_ALLOWED;
    let body = json!({
        "error": { "http_code": status.as_u16(), "message": "Method Not Allowed" }
    });
    (status, Json(body))
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceConfig;
    use crate::core::transformer::FieldsTransformer;
    use crate::storage::InMemoryStore;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn controller(name: &str) -> ResourceController<InMemoryStore> {
        ResourceController::new(
            ResourceConfig::new(name),
            Arc::new(InMemoryStore::new()),
            FieldsTransformer::new(["id"]),
        )
    }

    #[test]
    fn test_new_builder_has_no_resources() {
        assert!(ServerBuilder::new().resources().is_empty());
        assert!(ServerBuilder::default().resources().is_empty());
    }

    #[test]
    fn test_register_resources() {
        let builder = ServerBuilder::new()
            .register(controller("posts"))
            .register(controller("users"));
        assert_eq!(builder.resources(), vec!["posts", "users"]);
    }

    #[tokio::test]
    async fn test_fluent_chaining_full_pipeline() {
        let app = ServerBuilder::new()
            .with_config(ApiConfig::default())
            .with_custom_routes(Router::new().route("/ping", get(|| async { "pong" })))
            .with_cors(CorsLayer::permissive())
            .register(controller("posts"))
            .build();

        for uri in ["/health", "/ping", "/posts"] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unmatched_requests_get_json_errors() {
        let app = ServerBuilder::new().register(controller("posts")).build();

        let cases = [
            (Request::get("/nope"), StatusCode::NOT_FOUND, "Resource Not Found"),
            (Request::delete("/posts"), StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
        ];
        for (request, status, message) in cases {
            let response = app
                .clone()
                .oneshot(request.body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), status);

            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(
                body,
                json!({"error": {"http_code": status.as_u16(), "message": message}})
            );
        }
    }
}
