//! Length-prefixed frame codec: `[u32 big-endian length][JSON body]`.
//!
//! Both the 4-byte length and the N-byte body are read with "read exactly
//! this many bytes or fail" semantics (`AsyncReadExt::read_exact`), never a
//! single best-effort `read()` call. A frame that can't be decoded, or whose
//! declared length exceeds `max_frame_bytes`, is a fatal error for the
//! session — the caller owns tearing down the connection.

use crate::frame::Frame;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Default ceiling on a single frame's JSON body, per the spec's recommendation.
pub const DEFAULT_MAX_FRAME_BYTES: u32 = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error reading frame: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame length {size} exceeds maximum {max}")]
    FrameTooLarge { size: u32, max: u32 },
    #[error("malformed frame JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("connection closed before a complete frame was read")]
    Eof,
}

/// Read exactly one frame, or fail fatally.
///
/// A clean EOF at the very start of a frame (zero bytes read for the length
/// prefix) is reported as [`CodecError::Eof`] — the ordinary "worker hung
/// up" case. An EOF in the middle of a frame is [`CodecError::Io`] wrapping
/// an `UnexpectedEof`, since partial delivery then silence is a protocol
/// violation rather than a clean close.
pub async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
    max_frame_bytes: u32,
) -> Result<Frame, CodecError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Err(CodecError::Eof),
        Err(e) => return Err(CodecError::Io(e)),
    }
    let len = u32::from_be_bytes(len_buf);
    if len > max_frame_bytes {
        return Err(CodecError::FrameTooLarge { size: len, max: max_frame_bytes });
    }

    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;

    let frame: Frame = serde_json::from_slice(&body)?;
    Ok(frame)
}

/// Encode and write one frame in a single logical write (length prefix then
/// body, both flushed through the same writer so no other task's frame can
/// interleave between them when callers serialize access with their own
/// write gate — see the worker-session writer discipline).
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    frame: &Frame,
) -> Result<(), CodecError> {
    let body = serde_json::to_vec(frame)?;
    let len = u32::try_from(body.len()).map_err(|_| CodecError::FrameTooLarge {
        size: u32::MAX,
        max: u32::MAX,
    })?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}
