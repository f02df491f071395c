//! Unified error type for the Gobang server.

use std::io;
use std::path::PathBuf;

use gobang_transport::TransportError;

/// Errors that stop the server from starting or running.
///
/// Protocol, session and room errors never get this far: they are
/// answered with a failure response or close a single connection.
#[derive(Debug, thiserror::Error)]
pub enum GobangError {
    /// A transport-level error (bind, accept, read, write).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for [`ServerConfig`](crate::ServerConfig).
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The dispatch worker is gone, so no connection can be served.
    #[error("dispatch worker stopped")]
    DispatcherStopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let gobang_err: GobangError = err.into();
        assert!(matches!(gobang_err, GobangError::Transport(_)));
        assert!(gobang_err.to_string().contains("gone"));
    }

    #[test]
    fn test_config_read_names_the_path() {
        let err = GobangError::ConfigRead {
            path: PathBuf::from("/etc/gobang.json"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/etc/gobang.json"));
    }
}
