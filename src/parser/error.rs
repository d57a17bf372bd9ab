//! Error types for the HTTP request parser.

use thiserror::Error;

/// Errors that can occur while reading a request off a connection.
///
/// Every variant except [`Error::Io`] describes a request the peer sent
/// incorrectly; the connection handler answers those with a `400 Bad Request`
/// (or `413` for [`Error::BodyTooLarge`]) without consulting the dispatcher.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection closed before a request line was received.
    #[error("Empty request")]
    EmptyRequest,

    /// The request line could not be split into a method and a target.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The HTTP method in the request is not supported.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The request target has no pathname.
    #[error("Invalid HTTP path: {0}")]
    InvalidPath(String),

    /// A request or header line exceeded the configured limit.
    #[error("Line exceeds {0} bytes")]
    LineTooLong(usize),

    /// A request or header line is not valid UTF-8.
    #[error("Invalid UTF-8 in request head")]
    InvalidUtf8,

    /// The Content-Length header value is not a non-negative integer.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// A body-bearing method was sent without a Content-Length header.
    #[error("Content-Length is required for {0} requests")]
    MissingContentLength(String),

    /// The declared body is larger than the configured limit.
    #[error("Body of {declared} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { declared: usize, limit: usize },

    /// The peer closed the connection before sending the declared body.
    #[error("Body ended after {received} of {expected} bytes")]
    IncompleteBody { expected: usize, received: usize },

    /// The request body does not carry JSON.
    #[error("Required header is missing: {0}")]
    MissingHeader(String),

    /// Reading from the connection failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing JSON.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Returns true when the error was caused by what the peer sent rather
    /// than by the transport.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::JsonError(_) | Error::MissingHeader(_))
    }
}
