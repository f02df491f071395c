//! `GobangServer` builder and accept loop.
//!
//! This is the entry point for running a Gobang server. It ties together
//! all the layers: transport → protocol → dispatch → session/room.

use std::net::{SocketAddr, SocketAddrV4};
use std::time::Duration;

use gobang_protocol::SessionId;
use gobang_transport::{TcpTransport, Transport};
use tokio::sync::mpsc;

use crate::connection::{read_loop, write_loop};
use crate::dispatch::{Command, Dispatcher};
use crate::{GobangError, ServerConfig};

/// Pause after a failed accept, so a persistent error (e.g. out of file
/// descriptors) doesn't spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Builder for configuring and starting a Gobang server.
///
/// # Example
///
/// ```rust,no_run
/// use gobang::prelude::*;
///
/// # async fn start() -> Result<(), GobangError> {
/// let server = GobangServer::builder()
///     .bind("127.0.0.1:8848".parse().unwrap())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GobangServerBuilder {
    config: ServerConfig,
}

impl GobangServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: SocketAddrV4) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Sets the name given to sessions that haven't enrolled.
    pub fn default_name(mut self, name: impl Into<String>) -> Self {
        self.config.default_name = name.into();
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener. Nothing is accepted until
    /// [`run()`](GobangServer::run) is called.
    pub async fn build(self) -> Result<GobangServer, GobangError> {
        let transport = TcpTransport::bind(SocketAddr::V4(self.config.bind_addr)).await?;
        Ok(GobangServer {
            transport,
            config: self.config,
        })
    }
}

/// A bound Gobang server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GobangServer {
    transport: TcpTransport,
    config: ServerConfig,
}

impl GobangServer {
    /// Creates a new builder.
    pub fn builder() -> GobangServerBuilder {
        GobangServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Starts the dispatch worker and runs the accept loop.
    ///
    /// Each accepted connection is registered with the dispatch worker
    /// before its reader starts, then gets a reader task and a writer task.
    /// Accept errors are logged and retried after a short pause. Only
    /// returns if the dispatch worker has gone away.
    pub async fn run(mut self) -> Result<(), GobangError> {
        let (dispatcher, commands) = Dispatcher::new(&self.config);
        tokio::spawn(dispatcher.run());

        tracing::info!(addr = %self.config.bind_addr, "Gobang server running");

        loop {
            let conn = accept_next(&mut self.transport).await;
            let session = SessionId(conn.id().into_inner());
            let peer = conn.peer_addr();
            let (reader, writer) = conn.into_split();
            let (outbound, outbound_rx) = mpsc::unbounded_channel();

            commands
                .send(Command::Connected {
                    session,
                    peer,
                    outbound,
                })
                .map_err(|_| GobangError::DispatcherStopped)?;

            tokio::spawn(read_loop(session, reader, commands.clone()));
            tokio::spawn(write_loop(session, writer, outbound_rx, commands.clone()));
        }
    }
}

/// Accepts the next connection, retrying after [`ACCEPT_BACKOFF`] on
/// errors.
async fn accept_next<T: Transport>(transport: &mut T) -> T::Connection {
    loop {
        match transport.accept().await {
            Ok(conn) => return conn,
            Err(e) => {
                tracing::error!(error = %e, "accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use gobang_transport::TransportError;
    use tokio::time::Instant;

    use super::*;

    /// Fails `failures` times, then hands out connection `7`.
    struct FlakyTransport {
        failures: usize,
        attempts: usize,
    }

    impl Transport for FlakyTransport {
        type Connection = u64;
        type Error = TransportError;

        async fn accept(&mut self) -> Result<u64, TransportError> {
            self.attempts += 1;
            if self.attempts <= self.failures {
                Err(TransportError::AcceptFailed(io::Error::other(
                    "too many open files",
                )))
            } else {
                Ok(7)
            }
        }
    }

    #[tokio::test]
    async fn test_accept_backs_off_between_failures() {
        let mut transport = FlakyTransport {
            failures: 2,
            attempts: 0,
        };

        let started = Instant::now();
        let conn = accept_next(&mut transport).await;

        assert_eq!(conn, 7);
        assert_eq!(transport.attempts, 3);
        assert!(started.elapsed() >= ACCEPT_BACKOFF * 2);
    }

    #[tokio::test]
    async fn test_accept_returns_immediately_on_success() {
        let mut transport = FlakyTransport {
            failures: 0,
            attempts: 0,
        };

        let started = Instant::now();
        assert_eq!(accept_next(&mut transport).await, 7);
        assert!(started.elapsed() < ACCEPT_BACKOFF);
    }
}
