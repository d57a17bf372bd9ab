//! A small card game front end demonstrating the cardgame-http server API.
//!
//! Run with `RUST_LOG=debug cargo run --example card_server -- 10001`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cardgame_http::{
    content_type, dispatch_fn, HttpResponse, HttpServer, Method, ServerConfig, ServerError, StatusCode,
};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct Credentials {
    #[serde(rename = "Username")]
    username: String,
}

#[derive(Serialize)]
struct Session {
    token: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    let port = match std::env::args().nth(1) {
        Some(port) => port.parse()?,
        None => cardgame_http::server::DEFAULT_PORT,
    };

    let packages_sold = Arc::new(AtomicU64::new(0));

    let server = HttpServer::new(
        ServerConfig::with_port(port),
        dispatch_fn(move |request| {
            let packages_sold = packages_sold.clone();
            async move {
                match (request.method(), request.pathname()) {
                    (Method::POST, "/sessions") => {
                        let credentials: Credentials = match request.json() {
                            Ok(credentials) => credentials,
                            Err(e) => {
                                return Ok(HttpResponse::new(StatusCode::BadRequest).with_body_string(e.to_string()));
                            }
                        };
                        HttpResponse::new(StatusCode::Ok).with_json(&Session {
                            token: format!("{}-mtcgToken", credentials.username),
                        })
                    }
                    (Method::POST, "/transactions/packages") => match request.authorization() {
                        Some(_) => {
                            let sold = packages_sold.fetch_add(1, Ordering::SeqCst) + 1;
                            Ok(HttpResponse::new(StatusCode::Created)
                                .with_body_string(format!("Package {sold} acquired")))
                        }
                        None => Ok(HttpResponse::new(StatusCode::Unauthorized)
                            .with_body_string("Access token is missing or invalid")),
                    },
                    (Method::GET, "/") => Ok(HttpResponse::new(StatusCode::Ok)
                        .with_content_type(content_type::HTML)
                        .with_body_string("<html><body><h1>Monster Trading Cards</h1></body></html>")),
                    (Method::GET, "/fail") => Err(ServerError::InternalError("requested failure".to_string())),
                    _ => Ok(HttpResponse::new(StatusCode::NotFound)
                        .with_body_string(format!("Not found: {}", request.pathname()))),
                }
            }
        }),
    );

    info!("Routes: POST /sessions, POST /transactions/packages, GET /, GET /fail");

    server.start().await?;

    Ok(())
}
