//! TCP socket carrying framed QASM messages to and from the qSim server.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::qbus::framing::{
    read_frame, write_frame, FrameError, DEFAULT_MAX_FRAME_LEN, MAX_FRAME_LEN,
};

/// Transport-level error types.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to reach the server.
    #[error("Connection to {addr} failed: {source}")]
    ConnectionFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// No frame arrived within the configured read timeout.
    #[error("Read timed out after {0:?}")]
    Timeout(Duration),

    /// Framing failure (closed stream, truncated or oversized frame).
    #[error("Framing error: {0}")]
    Frame(#[from] FrameError),
}

/// Connected QASM socket.
///
/// Owns both halves of one TCP stream. Exactly one frame is written per
/// `send` and exactly one frame is read per `receive`.
pub struct QasmSocket {
    /// Buffered reader for incoming frames.
    reader: BufReader<OwnedReadHalf>,
    /// Writer for outgoing frames.
    writer: OwnedWriteHalf,
    /// Per-frame read timeout; `None` waits forever.
    read_timeout: Option<Duration>,
    /// Largest frame accepted from the peer.
    max_frame_len: usize,
    /// Peer address, kept for diagnostics.
    peer: String,
}

impl QasmSocket {
    /// Connect to the qSim server at `addr` (`host:port`).
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ConnectionFailed` if the address cannot be
    /// resolved or the connection is refused.
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| TransportError::ConnectionFailed {
                addr: addr.to_string(),
                source,
            })?;
        // One small frame per request: do not wait to coalesce.
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not set TCP_NODELAY on {}: {}", addr, e);
        }

        let (read_half, write_half) = stream.into_split();
        debug!("qbus socket connected to {}", addr);

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            read_timeout: None,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            peer: addr.to_string(),
        })
    }

    /// Connect with automatic retry and exponential backoff.
    ///
    /// Retries with delays of 100ms, 200ms, 400ms, etc. An `attempts` value
    /// of 0 is treated as 1.
    ///
    /// # Errors
    ///
    /// Returns the last connection error if all attempts fail.
    pub async fn connect_with_retry(addr: &str, attempts: u32) -> Result<Self, TransportError> {
        let attempts = attempts.max(1);
        let mut attempt = 1;

        loop {
            match Self::connect(addr).await {
                Ok(socket) => return Ok(socket),
                Err(e) if attempt < attempts => {
                    // Exponential backoff: 100ms, 200ms, 400ms, ...
                    let delay = Duration::from_millis(100 * (1u64 << (attempt - 1).min(10)));
                    debug!(
                        "Connect attempt {}/{} to {} failed ({}), retrying in {:?}",
                        attempt, attempts, addr, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Set the read timeout applied to every `receive`.
    pub fn set_read_timeout(&mut self, read_timeout: Option<Duration>) {
        self.read_timeout = read_timeout;
    }

    /// Set the largest frame accepted from the peer (capped at the header limit).
    pub fn set_max_frame_len(&mut self, max_frame_len: usize) {
        self.max_frame_len = max_frame_len.min(MAX_FRAME_LEN);
    }

    /// Peer address this socket was opened to.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Send one framed payload.
    pub async fn send(&mut self, payload: &str) -> Result<(), TransportError> {
        write_frame(&mut self.writer, payload).await?;
        debug!(len = payload.len(), "qbus frame sent");
        Ok(())
    }

    /// Receive one framed payload, honouring the read timeout.
    pub async fn receive(&mut self) -> Result<String, TransportError> {
        let payload = match self.read_timeout {
            Some(limit) => timeout(limit, read_frame(&mut self.reader, self.max_frame_len))
                .await
                .map_err(|_| TransportError::Timeout(limit))??,
            None => read_frame(&mut self.reader, self.max_frame_len).await?,
        };
        debug!(len = payload.len(), "qbus frame received");
        Ok(payload)
    }

    /// Close the connection.
    ///
    /// Shutdown failures are logged only: the socket is released either way.
    pub async fn disconnect(mut self) {
        if let Err(e) = self.writer.shutdown().await {
            debug!("Socket shutdown for {} reported: {}", self.peer, e);
        }
        debug!("qbus socket to {} closed", self.peer);
    }
}
