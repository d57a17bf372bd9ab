//! HTTP request parsing and representation.

use std::str::FromStr;
use log::debug;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::policy::AuthorizationPolicy;

/// A fully parsed HTTP request.
///
/// Values of this type only come out of [`parse_request`], so every field is
/// already validated: the pathname is non-empty and the body holds exactly
/// `content_length` bytes for POST and PUT requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: Method,
    pathname: String,
    query: String,
    content_type: Option<String>,
    content_length: Option<usize>,
    authorization: Option<String>,
    body: Vec<u8>,
}

impl HttpRequest {
    /// The request method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The request target up to the first `?`.
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Everything after the first `?` of the request target, unparsed.
    ///
    /// Empty when the target has no query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The Content-Type header value, if one was sent.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The Content-Length header value, if one was sent.
    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    /// The bearer token, retained only for routes the authorization policy
    /// lists.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// The raw request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The request body as text, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Check if the request has a JSON body.
    ///
    /// # Returns
    ///
    /// true if the Content-Type header is application/json, false otherwise
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.starts_with("application/json"))
    }

    /// Parse the request body as JSON.
    ///
    /// # Returns
    ///
    /// The parsed JSON value, or an error if the body is not valid JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            return Err(Error::MissingHeader("Content-Type: application/json".to_string()));
        }

        let json = serde_json::from_slice(&self.body)?;
        Ok(json)
    }
}

/// Upper bounds applied while reading a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum length of the request line or a header line, excluding the
    /// line terminator.
    pub max_line_length: usize,
    /// Maximum accepted Content-Length.
    pub max_body_size: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_line_length: 8 * 1024,
            max_body_size: 1024 * 1024,
        }
    }
}

/// Headers the parser interprets; everything else is read and dropped.
#[derive(Debug, Default)]
struct Headers {
    content_type: Option<String>,
    content_length: Option<usize>,
    bearer: Option<String>,
}

/// Parse one HTTP request from a buffered stream.
///
/// Reads the request line, then header lines up to the first blank line,
/// then, for POST and PUT only, exactly `Content-Length` body bytes. Nothing
/// past the body is consumed.
///
/// # Arguments
///
/// * `reader` - The buffered connection input
/// * `policy` - Decides whether the bearer token is kept
/// * `limits` - Line and body size limits
///
/// # Returns
///
/// The parsed request, or an error if the request is malformed or the
/// connection failed
pub async fn parse_request<R>(
    reader: &mut R,
    policy: &AuthorizationPolicy,
    limits: &ParseLimits,
) -> Result<HttpRequest, Error>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = match read_line(reader, limits.max_line_length).await? {
        Some(line) => line,
        None => return Err(Error::EmptyRequest),
    };

    // Method, target and an ignored protocol version
    let mut parts = request_line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next()) {
        (Some(method), Some(target)) => (method, target),
        _ => return Err(Error::MalformedRequestLine(request_line.clone())),
    };
    let method = Method::from_str(method)?;

    let (pathname, query) = target.split_once('?').unwrap_or((target, ""));
    if pathname.is_empty() {
        return Err(Error::InvalidPath(target.to_string()));
    }

    let headers = read_headers(reader, limits.max_line_length).await?;

    let authorization = headers
        .bearer
        .filter(|_| policy.requires_authorization(method, pathname));

    let body = if method.has_body() {
        let declared = headers
            .content_length
            .ok_or_else(|| Error::MissingContentLength(method.to_string()))?;
        read_body(reader, declared, limits.max_body_size).await?
    } else {
        Vec::new()
    };

    debug!("Parsed {method} {pathname} ({} body bytes)", body.len());

    Ok(HttpRequest {
        method,
        pathname: pathname.to_string(),
        query: query.to_string(),
        content_type: headers.content_type,
        content_length: headers.content_length,
        authorization,
        body,
    })
}

async fn read_headers<R>(reader: &mut R, max_line_length: usize) -> Result<Headers, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = Headers::default();

    // A closed stream ends the header block just like a blank line
    while let Some(line) = read_line(reader, max_line_length).await? {
        if line.is_empty() {
            break;
        }

        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        if name.eq_ignore_ascii_case("Content-Type") {
            headers.content_type = Some(value.to_string());
        } else if name.eq_ignore_ascii_case("Content-Length") {
            let length = value
                .parse::<usize>()
                .map_err(|_| Error::InvalidContentLength(value.to_string()))?;
            headers.content_length = Some(length);
        } else if name.eq_ignore_ascii_case("Authorization") {
            headers.bearer = bearer_token(value).map(str::to_string);
        }
    }

    Ok(headers)
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

async fn read_body<R>(reader: &mut R, declared: usize, max_body_size: usize) -> Result<Vec<u8>, Error>
where
    R: AsyncBufRead + Unpin,
{
    if declared > max_body_size {
        return Err(Error::BodyTooLarge { declared, limit: max_body_size });
    }

    let mut body = Vec::with_capacity(declared);
    (&mut *reader).take(declared as u64).read_to_end(&mut body).await?;

    if body.len() != declared {
        return Err(Error::IncompleteBody { expected: declared, received: body.len() });
    }

    Ok(body)
}

/// Read one line without its `\n` or `\r\n` terminator.
///
/// Returns `None` when the stream is already at its end.
async fn read_line<R>(reader: &mut R, max_line_length: usize) -> Result<Option<String>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    // Room for the content plus "\r\n"
    let mut limited = (&mut *reader).take(max_line_length as u64 + 2);
    let n = limited.read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    if buf.len() > max_line_length {
        return Err(Error::LineTooLong(max_line_length));
    }

    String::from_utf8(buf).map(Some).map_err(|_| Error::InvalidUtf8)
}
