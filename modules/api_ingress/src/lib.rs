//! HTTP host for the service modules.
//!
//! Modules hand over their axum routes and their OpenAPI fragment; the
//! ingress adds `/health` and `/openapi.json`, wraps everything in the shared
//! middleware stack and runs the listener until cancelled.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{middleware::from_fn, response::Json, routing::get, Router};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::{Info, OpenApi, Paths};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiIngress {
    config: ApiIngressConfig,
    request_timeout: Duration,
    openapi: Mutex<OpenApi>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            openapi: Mutex::new(OpenApi::new(
                Info::new("Employees API", env!("CARGO_PKG_VERSION")),
                Paths::new(),
            )),
        }
    }

    /// Per-request handler timeout; zero keeps the default.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.request_timeout = timeout;
        }
        self
    }

    /// Merge a module's OpenAPI paths and components into the served document.
    pub fn register_openapi(&self, doc: OpenApi) {
        self.openapi.lock().merge(doc);
    }

    pub fn openapi(&self) -> OpenApi {
        self.openapi.lock().clone()
    }

    /// Final router: module routes, health, docs and the middleware stack.
    pub fn build_router(&self, routes: Router) -> Router {
        let mut router = routes.route("/health", get(web::health_check));

        if self.config.enable_docs {
            let doc = Arc::new(self.openapi());
            router = router.route(
                "/openapi.json",
                get(move || {
                    let doc = Arc::clone(&doc);
                    async move { Json((*doc).clone()) }
                }),
            );
        }

        // Layers run outermost-last: the final `.layer` sees the request first.
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router = router.layer(TimeoutLayer::new(self.request_timeout));

        let x_request_id = request_id::header();
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router = router.layer(request_id::create_trace_layer());
        router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind `addr` and serve `router` until `cancel` fires.
    pub async fn serve(
        &self,
        addr: SocketAddr,
        router: Router,
        cancel: CancellationToken,
    ) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", listener.local_addr()?);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
