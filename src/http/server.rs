//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, CORS, headers)
//! - Serve the static landing page
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::handler::HandlerWithoutStateExt;
use axum::http::{header, HeaderValue};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::error::json_middleware_errors;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::lifecycle::ShutdownSignal;
use crate::qr::{QrCodeRenderer, QrRenderer, RenderDispatcher};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: RenderDispatcher,
    pub service_name: Arc<str>,
}

/// HTTP server for the QR service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by the default renderer.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_renderer(config, Arc::new(QrCodeRenderer))
    }

    /// Create a new HTTP server with a specific renderer.
    pub fn with_renderer(config: ServiceConfig, renderer: Arc<dyn QrRenderer>) -> Self {
        let dispatcher = RenderDispatcher::new(
            renderer,
            config.render.error_correction,
            Duration::from_secs(config.render.timeout_secs),
        );

        let state = AppState {
            dispatcher,
            service_name: Arc::from(config.service.name.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let static_files = ServeDir::new(&config.service.public_dir)
            .call_fallback_on_method_not_allowed(true)
            .not_found_service(handlers::not_found.into_service());

        let mut router = Router::new()
            .route("/generate-qr", post(handlers::generate_qr))
            .route("/qr", get(handlers::qr_image))
            .route("/health", get(handlers::health))
            .method_not_allowed_fallback(handlers::not_found)
            .fallback_service(static_files)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::map_response(json_middleware_errors));

        if config.security.enable_headers {
            router = router.layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ));
        }
        if config.security.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(set_request_id_layer())
    }

    /// A clone of the fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.service.name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
