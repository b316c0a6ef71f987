//! In-memory byte pipe between the capture task and the send task.
//!
//! Writes wait while the pipe is full and reads wait while it is empty.
//! Dropping or closing the writer makes the reader observe end-of-data
//! (`read` returning 0) once every buffered byte has been delivered.

use crate::frame::encode_le;
use speechpipe_core::AudioError;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWriteExt, DuplexStream, ReadBuf};

/// Create a conduit holding at most `capacity` unread bytes.
pub fn byte_conduit(capacity: usize) -> (ConduitWriter, ConduitReader) {
    let (write_end, read_end) = tokio::io::duplex(capacity);
    (
        ConduitWriter {
            inner: write_end,
            scratch: Vec::new(),
            bytes_written: 0,
        },
        ConduitReader { inner: read_end },
    )
}

pub struct ConduitWriter {
    inner: DuplexStream,
    scratch: Vec<u8>,
    bytes_written: u64,
}

impl ConduitWriter {
    /// Write a frame as little-endian bytes, waiting for space as needed.
    pub async fn write_samples(&mut self, samples: &[i16]) -> Result<(), AudioError> {
        self.scratch.clear();
        encode_le(samples, &mut self.scratch);
        self.inner
            .write_all(&self.scratch)
            .await
            .map_err(AudioError::ConduitClosed)?;
        self.bytes_written += self.scratch.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Signal end-of-data to the reader.
    pub async fn close(mut self) -> Result<(), AudioError> {
        self.inner
            .shutdown()
            .await
            .map_err(AudioError::ConduitClosed)
    }
}

pub struct ConduitReader {
    inner: DuplexStream,
}

impl AsyncRead for ConduitReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_write_then_read_bytes() {
        let (mut writer, mut reader) = byte_conduit(64);
        writer.write_samples(&[1, -1]).await.unwrap();
        assert_eq!(writer.bytes_written(), 4);

        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).await.unwrap();
        assert_eq!(buf, [0x01, 0x00, 0xFF, 0xFF]);
    }

    #[tokio::test]
    async fn test_close_delivers_buffered_bytes_then_eof() {
        let (mut writer, mut reader) = byte_conduit(64);
        writer.write_samples(&[7, 8, 9]).await.unwrap();
        writer.close().await.unwrap();

        let mut all = Vec::new();
        reader.read_to_end(&mut all).await.unwrap();
        assert_eq!(all.len(), 6);

        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_drop_writer_is_eof() {
        let (writer, mut reader) = byte_conduit(64);
        drop(writer);
        let mut buf = [0u8; 8];
        let n = tokio::time::timeout(Duration::from_secs(2), reader.read(&mut buf))
            .await
            .expect("timed out")
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_write_blocks_when_full() {
        let (mut writer, mut reader) = byte_conduit(4);
        writer.write_samples(&[1, 2]).await.unwrap();

        let blocked =
            tokio::time::timeout(Duration::from_millis(20), writer.write_samples(&[3])).await;
        assert!(blocked.is_err(), "write into a full conduit must wait");

        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_after_reader_dropped_fails() {
        let (mut writer, reader) = byte_conduit(64);
        drop(reader);
        match writer.write_samples(&[1]).await {
            Err(AudioError::ConduitClosed(_)) => {}
            other => panic!("expected ConduitClosed, got {:?}", other),
        }
    }
}
