//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::parser::ParseLimits;

/// Port the card game clients connect to by default.
pub const DEFAULT_PORT: u16 = 10001;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// Longest request or header line accepted, terminator excluded.
    pub max_line_length: usize,
    /// Largest Content-Length accepted for POST and PUT bodies.
    pub max_body_size: usize,
    /// How long shutdown waits for in-flight connections.
    pub shutdown_grace: Duration,
}

impl ServerConfig {
    /// Default configuration listening on all interfaces at `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            ..Self::default()
        }
    }

    pub fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_line_length: self.max_line_length,
            max_body_size: self.max_body_size,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let limits = ParseLimits::default();
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            max_line_length: limits.max_line_length,
            max_body_size: limits.max_body_size,
            shutdown_grace: Duration::from_secs(30),
        }
    }
}
