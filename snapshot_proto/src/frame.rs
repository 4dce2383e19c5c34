//! Length-prefixed framing: a little-endian `u32` byte count followed by the
//! encoded protobuf message.

use std::io;

use prost::Message;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const FRAME_HEADER_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame io failed: {0}")]
    Io(#[from] io::Error),
    #[error("frame of {len} bytes exceeds limit of {limit}")]
    TooLarge { len: usize, limit: usize },
    #[error("decode failed: {0}")]
    Decode(#[from] prost::DecodeError),
}

pub async fn write_frame<W>(writer: &mut W, frame: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(frame.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "frame exceeds u32 length"))?;
    let mut buffer = Vec::with_capacity(FRAME_HEADER_LEN + frame.len());
    buffer.extend_from_slice(&len.to_le_bytes());
    buffer.extend_from_slice(frame);
    writer.write_all(&buffer).await?;
    writer.flush().await
}

/// Read one frame. Returns `Ok(None)` when the peer closed the stream cleanly
/// between frames; a stream that ends inside a header is an error.
pub async fn read_frame<R>(reader: &mut R, limit: usize) -> Result<Option<Vec<u8>>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; FRAME_HEADER_LEN];
    let mut filled = 0;
    while filled < FRAME_HEADER_LEN {
        let read = reader.read(&mut len_buf[filled..]).await?;
        if read == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(FrameError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("stream ended after {filled} of {FRAME_HEADER_LEN} header bytes"),
            )));
        }
        filled += read;
    }
    let len = u32::from_le_bytes(len_buf) as usize;
    if len > limit {
        return Err(FrameError::TooLarge { len, limit });
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

pub async fn write_message<W, M>(writer: &mut W, message: &M) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    M: Message,
{
    write_frame(writer, &message.encode_to_vec()).await
}

pub async fn read_message<R, M>(reader: &mut R, limit: usize) -> Result<Option<M>, FrameError>
where
    R: AsyncRead + Unpin,
    M: Message + Default,
{
    match read_frame(reader, limit).await? {
        Some(payload) => Ok(Some(M::decode(payload.as_slice())?)),
        None => Ok(None),
    }
}
