//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::task::JoinSet;
use log::{debug, error, info, warn};

use crate::policy::AuthorizationPolicy;
use crate::server::config::ServerConfig;
use crate::server::connection::handle_connection;
use crate::server::error::Error;
use crate::server::handler::Dispatch;

/// An HTTP server answering one request per connection.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// Decides which requests keep their bearer token.
    pub policy: AuthorizationPolicy,
    dispatcher: Arc<dyn Dispatch>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and dispatcher.
    pub fn new(config: ServerConfig, dispatcher: impl Dispatch) -> Self {
        Self {
            config,
            policy: AuthorizationPolicy::default(),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Replace the authorization retention policy.
    pub fn with_policy(mut self, policy: AuthorizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = listener.local_addr()?);
        Ok(listener)
    }

    /// Start the server and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        let listener = self.bind().await?;
        self.serve(listener, async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                    // Without a signal handler the server runs until killed
                    std::future::pending::<()>().await;
                }
            }
        })
        .await;
        Ok(())
    }

    /// Accept connections on `listener` until `shutdown` completes.
    ///
    /// Each accepted connection is handed to its own task immediately; the
    /// loop itself never touches the socket. Accept failures are logged and
    /// the loop keeps going.
    pub async fn serve(&self, listener: TcpListener, shutdown: impl Future<Output = ()>) {
        let mut workers = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            workers.spawn(self.connection_task(socket, addr));
                        }
                        Err(e) => Self::handle_accept_error(e).await,
                    }
                }

                Some(finished) = workers.join_next(), if !workers.is_empty() => {
                    if let Err(e) = finished {
                        error!("Connection task failed: {e}");
                    }
                }
            }
        }

        self.perform_shutdown(&mut workers).await;
    }

    fn connection_task(&self, mut socket: TcpStream, addr: SocketAddr) -> impl Future<Output = ()> + Send + 'static {
        let dispatcher = self.dispatcher.clone();
        let policy = self.policy;
        let limits = self.config.parse_limits();

        async move {
            debug!("Accepted connection from {addr}");
            match handle_connection(&mut socket, dispatcher, policy, limits).await {
                Ok(()) => {}
                Err(Error::ParseError(e)) => warn!("Bad request from {addr}: {e}"),
                Err(e) => error!("Error handling connection from {addr}: {e}"),
            }
            // Dropping the socket closes the connection
        }
    }

    async fn handle_accept_error(e: std::io::Error) {
        error!("Error accepting connection: {e}");

        // Typically descriptor exhaustion; back off before accepting again
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    /// Wait for in-flight connections, up to the configured grace period.
    async fn perform_shutdown(&self, workers: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = workers.len());
        let drained = tokio::time::timeout(self.config.shutdown_grace, async {
            while let Some(res) = workers.join_next().await {
                if let Err(e) = res {
                    error!("Connection task failed during shutdown: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!("Aborting {len} connections still open after grace period", len = workers.len());
            workers.abort_all();
        }

        info!("Server shutdown complete");
    }
}
