//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use radix_router::config::parse_config;
use radix_router::http::HttpServer;

/// Route table exercised by the HTTP tests.
pub const ROUTES: &str = r#"
[listener]
bind_address = "127.0.0.1:0"

[[routes]]
name = "user"
methods = ["GET"]
path = "/users/:id"
handlers = [{ type = "params" }]

[[routes]]
methods = ["GET"]
path = "/users/new"
handlers = [{ type = "text", body = "new user form" }]

[[routes]]
methods = ["POST"]
path = "/users"
handlers = [
    { type = "status", code = 201 },
    { type = "header", name = "location", value = "/users/1" },
    { type = "json", body = { id = 1 } },
]

[[routes]]
methods = ["GET"]
path = "/users/:id/posts/:post"
handlers = [{ type = "params" }]

[[groups]]
prefix = "/static"
handlers = [{ type = "header", name = "cache-control", value = "max-age=60" }]

[[groups.routes]]
methods = ["GET", "HEAD"]
path = "/*filepath"
handlers = [{ type = "params" }]
"#;

/// Server built from [`ROUTES`].
pub fn server() -> HttpServer {
    server_from(ROUTES)
}

pub fn server_from(toml: &str) -> HttpServer {
    let config = parse_config(toml).unwrap();
    HttpServer::from_config(config).unwrap()
}

/// Drive one request through `app` without a socket.
pub async fn send(app: axum::Router, method: &str, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
