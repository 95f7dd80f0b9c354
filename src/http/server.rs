//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with a single dispatch fallback
//! - Wire up middleware (request ID, tracing, timeout)
//! - Dispatch requests through the current route table
//! - Publish rebuilt route tables received from the config watcher
//! - Observability (metrics, correlation IDs)

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{build_router, ConfigError, RouterConfig};
use crate::http::handler::{run_chain, run_chain_with, Action};
use crate::observability::metrics::{self, UNMATCHED};
use crate::routing::{Lookup, Params, Router, SharedRouter};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: SharedRouter<Action>,
}

/// HTTP server answering requests from a radix route table.
pub struct HttpServer {
    app: axum::Router,
    config: RouterConfig,
    routes: SharedRouter<Action>,
}

impl HttpServer {
    /// Create a server around an already built route table.
    pub fn new(config: RouterConfig, router: Router<Action>) -> Self {
        let routes = SharedRouter::new(router);
        let state = AppState {
            routes: routes.clone(),
        };
        let app = Self::build_app(&config, state);
        Self { app, config, routes }
    }

    /// Build the route table from `config` and wrap it in a server.
    pub fn from_config(config: RouterConfig) -> Result<Self, ConfigError> {
        let router = build_router(&config)?;
        Ok(Self::new(config, router))
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The app as a tower service, for driving requests without a socket.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Handle to the live route table.
    pub fn routes(&self) -> SharedRouter<Action> {
        self.routes.clone()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, publishing every router
    /// received on `updates`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut updates: mpsc::UnboundedReceiver<Router<Action>>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.load().route_count(),
            "HTTP server starting"
        );

        let routes = self.routes.clone();
        let reloader = tokio::spawn(async move {
            while let Some(router) = updates.recv().await {
                routes.publish(router);
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown requested, draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request against the current table and run the matched chain.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let router = state.routes.load();

    let method = request.method().as_str();
    let path = request.uri().path();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    match router.find(method, path) {
        Lookup::Found(m) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                pattern = %m.pattern,
                params = m.params.len(),
                "Route matched"
            );
            let response = run_chain(m.handlers, m.pattern, &m.params);
            metrics::record_request(method, response.status().as_u16(), m.pattern, start_time);
            response
        }
        Lookup::NotFound => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
            let response = fallback(router.not_found(), StatusCode::NOT_FOUND, "not found!");
            metrics::record_request(method, response.status().as_u16(), UNMATCHED, start_time);
            response
        }
        Lookup::MethodNotAllowed => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "Method not allowed");
            let response = fallback(
                router.method_not_allowed(),
                StatusCode::METHOD_NOT_ALLOWED,
                "method not allowed!",
            );
            metrics::record_request(method, response.status().as_u16(), UNMATCHED, start_time);
            response
        }
    }
}

/// Run a configured negative-result chain, or the JSON default when none is set.
fn fallback(chain: &[Action], status: StatusCode, message: &str) -> Response {
    if chain.is_empty() {
        error_response(status, message)
    } else {
        run_chain_with(status, chain, UNMATCHED, &Params::new())
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "code": status.as_u16(), "message": message }))).into_response()
}
