use crate::conduit::ConduitWriter;
use crate::frame::FrameSource;
use speechpipe_core::AudioError;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames: u64,
    pub bytes: u64,
}

/// Move frames from `source` into the conduit until cancelled.
///
/// Cancellation is checked once after each frame has been written, so a frame
/// already read from the source always reaches the conduit. The writer is
/// closed on every exit path, which the reader observes as end-of-data.
pub async fn capture_frames<S>(
    mut source: S,
    mut writer: ConduitWriter,
    cancel: watch::Receiver<bool>,
    frame_samples: usize,
) -> Result<CaptureStats, AudioError>
where
    S: FrameSource,
{
    let mut frame = vec![0i16; frame_samples];
    let mut stats = CaptureStats::default();

    loop {
        source.read_frame(&mut frame).await?;
        writer.write_samples(&frame).await?;
        stats.frames += 1;

        let cancelled = *cancel.borrow();
        if cancelled {
            break;
        }
    }

    stats.bytes = writer.bytes_written();
    writer.close().await?;
    tracing::info!(
        frames = stats.frames,
        bytes = stats.bytes,
        "capture stopped"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conduit::byte_conduit;
    use crate::frame::decode_le;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;

    /// Yields consecutive sample values and raises `cancel` after `cancel_after` frames.
    struct CountingFrames {
        next: i16,
        served: u64,
        cancel_after: u64,
        cancel: watch::Sender<bool>,
    }

    #[async_trait]
    impl FrameSource for CountingFrames {
        async fn read_frame(&mut self, frame: &mut [i16]) -> Result<(), AudioError> {
            for s in frame.iter_mut() {
                *s = self.next;
                self.next = self.next.wrapping_add(1);
            }
            self.served += 1;
            if self.served == self.cancel_after {
                let _ = self.cancel.send(true);
            }
            Ok(())
        }
    }

    struct FailingFrames;

    #[async_trait]
    impl FrameSource for FailingFrames {
        async fn read_frame(&mut self, _frame: &mut [i16]) -> Result<(), AudioError> {
            Err(AudioError::StreamError("unplugged".to_string()))
        }
    }

    #[tokio::test]
    async fn test_capture_stops_after_cancel_and_closes_conduit() {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let source = CountingFrames {
            next: 0,
            served: 0,
            cancel_after: 3,
            cancel: cancel_tx,
        };
        let (writer, mut reader) = byte_conduit(1024);

        let task = tokio::spawn(capture_frames(source, writer, cancel_rx, 10));

        let mut bytes = Vec::new();
        tokio::time::timeout(Duration::from_secs(2), reader.read_to_end(&mut bytes))
            .await
            .expect("timed out")
            .unwrap();

        let stats = task.await.unwrap().unwrap();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.bytes, 60);
        assert_eq!(decode_le(&bytes), (0..30).collect::<Vec<i16>>());
    }

    #[tokio::test]
    async fn test_capture_cancelled_before_start_still_writes_one_frame() {
        let (cancel_tx, cancel_rx) = watch::channel(true);
        let source = CountingFrames {
            next: 100,
            served: 0,
            cancel_after: u64::MAX,
            cancel: cancel_tx,
        };
        let (writer, mut reader) = byte_conduit(1024);

        let stats = capture_frames(source, writer, cancel_rx, 4).await.unwrap();
        assert_eq!(stats.frames, 1);

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await.unwrap();
        assert_eq!(decode_le(&bytes), vec![100, 101, 102, 103]);
    }

    #[tokio::test]
    async fn test_capture_device_error_is_fatal_and_closes_conduit() {
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let (writer, mut reader) = byte_conduit(1024);

        let result = capture_frames(FailingFrames, writer, cancel_rx, 4).await;
        assert!(matches!(result, Err(AudioError::StreamError(_))));

        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf).await.unwrap(), 0);
    }
}
