use gobang_protocol::ProtocolError;

/// Errors that can occur in the transport layer.
///
/// Every variant except [`TransportError::Bind`] and
/// [`TransportError::AcceptFailed`] is terminal for the connection it
/// came from.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer closed the connection, possibly mid-frame.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listening socket failed.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting a connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// A frame arrived that could not be parsed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
