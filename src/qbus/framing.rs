//! Length-prefixed message framing for QASM over stream sockets.
//!
//! Every message travels as a binary length header followed by the ASCII
//! message text. The same layout is used in both directions.
//!
//! # Wire Format
//!
//! ```text
//! +----------------------+---------------------------+
//! | length (u32, LE, 4B) | payload (length bytes)    |
//! +----------------------+---------------------------+
//! ```
//!
//! The reader never assumes a single `read` returns a whole frame: both the
//! header and the body are accumulated over as many partial reads as the
//! peer needs.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Size of the length header in bytes.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Largest payload the 4-byte header can describe.
pub const MAX_FRAME_LEN: usize = u32::MAX as usize;

/// Default cap on accepted frames (100 MiB), well above a 20-qubit state dump.
pub const DEFAULT_MAX_FRAME_LEN: usize = 100 * 1024 * 1024;

/// Framing-level failures.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Peer closed the stream before a new frame started.
    #[error("Connection closed by peer")]
    Closed,

    /// Peer closed the stream in the middle of a frame.
    #[error("Connection closed mid-frame: expected {expected} bytes, received {received}")]
    Truncated { expected: usize, received: usize },

    /// Frame length is above the accepted maximum.
    #[error("Frame size {len} exceeds maximum {max} bytes")]
    TooLarge { len: usize, max: usize },

    /// Frame body is not valid UTF-8 text.
    #[error("Frame body is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Underlying stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read one length-prefixed frame from the stream.
///
/// # Protocol
///
/// 1. Accumulate exactly 4 bytes and decode them as a little-endian `u32`
/// 2. Reject lengths above `max_len`
/// 3. Accumulate exactly that many body bytes, growing the buffer as they
///    arrive
///
/// # Errors
///
/// Returns an error if:
/// - The stream is closed before the header starts (`FrameError::Closed`)
/// - The stream is closed part-way through the header or body
///   (`FrameError::Truncated`)
/// - The declared length exceeds `max_len` (`FrameError::TooLarge`)
/// - The body is not valid UTF-8 (`FrameError::Utf8`)
pub async fn read_frame<R>(reader: &mut R, max_len: usize) -> Result<String, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; LENGTH_PREFIX_LEN];
    let received = read_full(reader, &mut header).await?;
    if received == 0 {
        return Err(FrameError::Closed);
    }
    if received < LENGTH_PREFIX_LEN {
        return Err(FrameError::Truncated {
            expected: LENGTH_PREFIX_LEN,
            received,
        });
    }

    let len = u32::from_le_bytes(header) as usize;
    if len > max_len {
        return Err(FrameError::TooLarge { len, max: max_len });
    }

    let mut body = Vec::new();
    let received = (&mut *reader).take(len as u64).read_to_end(&mut body).await?;
    if received < len {
        return Err(FrameError::Truncated {
            expected: len,
            received,
        });
    }

    Ok(String::from_utf8(body)?)
}

/// Write one length-prefixed frame to the stream and flush it.
///
/// # Errors
///
/// Returns `FrameError::TooLarge` if the payload cannot be described by the
/// 4-byte header, or `FrameError::Io` if the write or flush fails.
pub async fn write_frame<W>(writer: &mut W, payload: &str) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    let body = payload.as_bytes();
    let len = u32::try_from(body.len()).map_err(|_| FrameError::TooLarge {
        len: body.len(),
        max: MAX_FRAME_LEN,
    })?;

    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;

    Ok(())
}

/// Fill `buf` from the reader, stopping early only on EOF.
///
/// Returns the number of bytes actually placed in `buf`.
async fn read_full<R>(reader: &mut R, buf: &mut [u8]) -> Result<usize, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
