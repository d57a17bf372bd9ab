//! A minimal HTTP/1.1 server core for the card game backend.
//!
//! The crate reads HTTP requests straight off TCP sockets, decides which
//! bearer tokens to keep according to a static policy table, hands each
//! well-formed request to an application supplied [`Dispatch`] and writes
//! the response back. Every connection carries exactly one request.
//!
//! # Features
//!
//! - Request line, header and Content-Length body parsing
//! - Authorization retention by (method, pathname) table
//! - Response serialization with a computed Content-Length
//! - One tokio task per connection, isolated failures
//! - JSON helpers for request and response bodies
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use cardgame_http::{parse_request, AuthorizationPolicy, Method, ParseLimits};
//!
//! # tokio_test_block(async {
//! let mut input: &[u8] = b"GET /cards?format=plain HTTP/1.1\r\nAuthorization: Bearer kienboec-mtcgToken\r\n\r\n";
//! let request = parse_request(&mut input, &AuthorizationPolicy::default(), &ParseLimits::default())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(request.method(), Method::GET);
//! assert_eq!(request.pathname(), "/cards");
//! assert_eq!(request.query(), "format=plain");
//! assert_eq!(request.authorization(), Some("kienboec-mtcgToken"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! ## Serving requests
//!
//! ```no_run
//! use cardgame_http::{dispatch_fn, HttpResponse, HttpServer, ServerConfig, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cardgame_http::ServerError> {
//!     let server = HttpServer::new(
//!         ServerConfig::with_port(10001),
//!         dispatch_fn(|request| async move {
//!             Ok(HttpResponse::new(StatusCode::Ok)
//!                 .with_body_string(format!("You asked for {}", request.pathname())))
//!         }),
//!     );
//!
//!     server.start().await
//! }
//! ```

// Export the parser module
pub mod parser;

// Export the authorization policy
pub mod policy;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, Method, ParseLimits, parse_request};
pub use policy::AuthorizationPolicy;
pub use server::{
    content_type, dispatch_fn, Dispatch, Error as ServerError, HttpResponse, HttpServer, ServerConfig, StatusCode,
};
