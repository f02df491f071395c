//! Exact-length frame reading and writing over any async byte stream.
//!
//! The reader never attempts to decode a partial header: it finishes a
//! 4-byte `read_exact` first, then reads exactly `length - 4` payload bytes.
//! A short read at either stage ends the connection.

use std::io;

use gobang_protocol::{Envelope, HEADER_LEN, decode_header};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::TransportError;

/// Reads whole frames from the receive half of a connection.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Reads the next frame.
    ///
    /// # Errors
    /// - [`TransportError::ConnectionClosed`] if the stream ends, including
    ///   mid-header or mid-payload.
    /// - [`TransportError::ReceiveFailed`] on any other I/O error.
    /// - [`TransportError::Protocol`] if the header's length is invalid.
    pub async fn recv(&mut self) -> Result<Envelope, TransportError> {
        let mut header = [0u8; HEADER_LEN];
        self.inner
            .read_exact(&mut header)
            .await
            .map_err(|e| read_error(e, "header"))?;
        let header = decode_header(&header)?;

        let mut payload = vec![0u8; header.payload_len()];
        if !payload.is_empty() {
            self.inner
                .read_exact(&mut payload)
                .await
                .map_err(|e| read_error(e, "payload"))?;
        }

        Ok(Envelope::from_raw(header.tag, payload)?)
    }
}

/// Writes whole frames to the send half of a connection.
#[derive(Debug)]
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Writes one frame and flushes it.
    pub async fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError> {
        self.inner
            .write_all(&envelope.to_bytes())
            .await
            .map_err(TransportError::SendFailed)?;
        self.inner.flush().await.map_err(TransportError::SendFailed)
    }

    /// Shuts down the write direction.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        self.inner.shutdown().await.map_err(TransportError::SendFailed)
    }
}

fn read_error(e: io::Error, stage: &str) -> TransportError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        TransportError::ConnectionClosed(format!("short read in {stage}"))
    } else {
        TransportError::ReceiveFailed(e)
    }
}
