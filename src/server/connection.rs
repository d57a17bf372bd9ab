//! Per-connection request lifecycle.

use std::sync::Arc;
use log::{debug, error, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::parser::{parse_request, Error as ParserError, HttpRequest, ParseLimits};
use crate::policy::AuthorizationPolicy;
use crate::server::error::Error;
use crate::server::handler::Dispatch;
use crate::server::response::{HttpResponse, StatusCode};

/// Serve exactly one request on `socket`.
///
/// Parses the request, dispatches it, writes the response and shuts the
/// write side down. A malformed request is answered with an empty `400`
/// without calling the dispatcher; a dispatcher error or panic is answered
/// with `500`. The returned error, if any, describes why the exchange did
/// not complete normally, after whatever response could be written.
pub async fn handle_connection(
    socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
    dispatcher: Arc<dyn Dispatch>,
    policy: AuthorizationPolicy,
    limits: ParseLimits,
) -> Result<(), Error> {
    // The reader is dropped before writing; unread input is discarded
    let parsed = {
        let mut reader = BufReader::new(&mut *socket);
        parse_request(&mut reader, &policy, &limits).await
    };

    let request = match parsed {
        Ok(request) => request,
        Err(ParserError::Io(e)) => return Err(Error::IoError(e)),
        Err(e) => {
            warn!("Rejecting malformed request: {e}");
            let response = HttpResponse::new(StatusCode::for_parse_error(&e));
            write_response(socket, &response).await?;
            return Err(Error::ParseError(e));
        }
    };

    let summary = format!("{} {}", request.method(), request.pathname());
    let (response, failure) = match dispatch(dispatcher, request).await {
        Ok(response) => (response, None),
        Err(e) => {
            error!("Dispatcher failed for {summary}: {e}");
            (HttpResponse::new(StatusCode::InternalServerError), Some(e))
        }
    };

    debug!("{summary} -> {}", response.status.code());
    write_response(socket, &response).await?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Run the dispatcher on its own task; a panic there becomes
/// `Error::DispatchPanicked`.
async fn dispatch(dispatcher: Arc<dyn Dispatch>, request: HttpRequest) -> Result<HttpResponse, Error> {
    let summary = format!("{} {}", request.method(), request.pathname());
    let task = tokio::spawn(async move { dispatcher.dispatch(request).await });

    match task.await {
        Ok(result) => result,
        Err(join_error) if join_error.is_panic() => Err(Error::DispatchPanicked(summary)),
        Err(join_error) => Err(Error::InternalError(join_error.to_string())),
    }
}

async fn write_response(
    socket: &mut (impl AsyncWrite + Unpin),
    response: &HttpResponse,
) -> Result<(), Error> {
    socket.write_all(&response.to_bytes()).await?;
    socket.flush().await?;
    socket.shutdown().await?;
    Ok(())
}
