//! HTTP request parser module.
//!
//! Reads exactly one request off a connection: the request line, the header
//! block and, for body-bearing methods, a Content-Length framed body.

mod request;
mod method;
mod error;

// Re-export public items
pub use request::{ParseLimits, HttpRequest};
pub use method::Method;
pub use error::Error;

// Re-export the parse_request function
pub use request::parse_request;
