//! HTTP server implementation for cardgame-http.
//!
//! One task per accepted connection; each task reads one request, hands it
//! to the application's dispatcher and writes one response before closing.

mod response;
mod config;
mod connection;
mod error;
mod handler;
mod http_server;

// Re-export public items
pub use response::{content_type, HttpResponse, StatusCode};
pub use config::{ServerConfig, DEFAULT_PORT};
pub use connection::handle_connection;
pub use error::Error;
pub use handler::{dispatch_fn, Dispatch, DispatchFuture};
pub use http_server::HttpServer;
