//! Per-connection tasks: one reads frames, one writes them.
//!
//! The reader turns frames into [`Command::Request`]s for the dispatch
//! worker. The writer drains the session's outbound queue, so everything
//! the worker sends to one client reaches the socket in the order it was
//! sent. Either side failing reports a [`Command::Disconnected`].

use gobang_protocol::{ClientMessage, ServerMessage, SessionId};
use gobang_transport::{FrameReader, FrameWriter};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

use crate::dispatch::{Command, CommandSender};

/// Reads frames until the connection ends, forwarding requests.
///
/// Frames whose type has no handler are dropped. A malformed payload ends
/// the connection like any other read error: once one payload is wrong,
/// the framing of the next can't be trusted.
pub(crate) async fn read_loop<R>(
    session: SessionId,
    mut reader: FrameReader<R>,
    commands: CommandSender,
) where
    R: AsyncRead + Unpin,
{
    let reason = loop {
        let envelope = match reader.recv().await {
            Ok(envelope) => envelope,
            Err(e) => break e.to_string(),
        };

        match ClientMessage::from_envelope(&envelope) {
            Ok(Some(request)) => {
                if commands.send(Command::Request { session, request }).is_err() {
                    break "dispatch worker stopped".to_string();
                }
            }
            Ok(None) => {
                tracing::debug!(%session, tag = envelope.tag(), "dropping frame with no handler");
            }
            Err(e) => {
                tracing::debug!(%session, tag = envelope.tag(), error = %e, "malformed payload");
                break format!("malformed payload: {e}");
            }
        }
    };

    let _ = commands.send(Command::Disconnected { session, reason });
}

/// Writes queued messages until the session is dropped by the dispatch
/// worker or a write fails, then shuts the socket's write side.
pub(crate) async fn write_loop<W>(
    session: SessionId,
    mut writer: FrameWriter<W>,
    mut outbound: mpsc::UnboundedReceiver<ServerMessage>,
    commands: CommandSender,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = outbound.recv().await {
        let envelope = match msg.to_envelope() {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(%session, msg_type = %msg.message_type(), error = %e, "failed to encode reply");
                continue;
            }
        };
        if let Err(e) = writer.send(&envelope).await {
            tracing::debug!(%session, error = %e, "write failed");
            let _ = commands.send(Command::Disconnected {
                session,
                reason: e.to_string(),
            });
            return;
        }
    }

    if let Err(e) = writer.close().await {
        tracing::debug!(%session, error = %e, "shutdown failed");
    }
}
