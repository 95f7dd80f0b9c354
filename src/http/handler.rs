//! Declarative handler chains.
//!
//! # Responsibilities
//! - Define the actions a route's chain is made of
//! - Run a matched chain into an HTTP response
//!
//! # Design Decisions
//! - Actions run in order; header and status actions only adjust the
//!   response being built
//! - The first action producing a body ends the chain
//! - A chain with no body action answers with an empty body

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::routing::Params;

/// One step of a route's handler chain.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Set a response header.
    Header { name: String, value: String },
    /// Set the response status.
    Status { code: u16 },
    /// Respond with plain text.
    Text { body: String },
    /// Respond with a fixed JSON document.
    Json { body: serde_json::Value },
    /// Respond with the matched pattern and the captured parameters.
    Params,
}

/// Run `chain` for a request that matched `pattern` with `params`.
pub fn run_chain(chain: &[Action], pattern: &str, params: &Params<'_, '_>) -> Response {
    run_chain_with(StatusCode::OK, chain, pattern, params)
}

/// Like [`run_chain`], starting from `status` instead of 200.
pub fn run_chain_with(status: StatusCode, chain: &[Action], pattern: &str, params: &Params<'_, '_>) -> Response {
    let mut status = status;
    let mut headers = HeaderMap::new();

    for action in chain {
        match action {
            Action::Header { name, value } => {
                match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                    (Ok(name), Ok(value)) => {
                        headers.insert(name, value);
                    }
                    _ => tracing::warn!(header = %name, "Skipping invalid header action"),
                }
            }
            Action::Status { code } => match StatusCode::from_u16(*code) {
                Ok(code) => status = code,
                Err(_) => tracing::warn!(code, "Skipping invalid status action"),
            },
            Action::Text { body } => return (status, headers, body.clone()).into_response(),
            Action::Json { body } => return (status, headers, Json(body.clone())).into_response(),
            Action::Params => {
                let body = json!({ "pattern": pattern, "params": params });
                return (status, headers, Json(body)).into_response();
            }
        }
    }

    (status, headers).into_response()
}
