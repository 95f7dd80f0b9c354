//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, trace)
//!     → dispatch (method + path against the current SharedRouter snapshot)
//!     → handler.rs (run the matched chain of actions)
//!     → Send to client; 404 / 405 as JSON when nothing matched
//! ```

pub mod handler;
pub mod server;

pub use handler::{run_chain, run_chain_with, Action};
pub use server::{AppState, HttpServer, X_REQUEST_ID};
