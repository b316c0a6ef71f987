use crate::frame::{f32_to_i16, FrameSource};
use async_trait::async_trait;
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Observer, Producer};
use ringbuf::{HeapCons, HeapProd};
use speechpipe_core::AudioError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── CaptureStatus ─────────────────────────────────────────────

/// State shared between the real-time callback and the frame reader.
#[derive(Clone, Default)]
pub struct CaptureStatus {
    failed: Arc<AtomicBool>,
    overruns: Arc<AtomicU64>,
}

impl CaptureStatus {
    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn set_failed(&self) {
        self.failed.store(true, Ordering::Relaxed);
    }

    /// Samples dropped because the ring buffer was full.
    pub fn overruns(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }

    fn add_overruns(&self, n: u64) {
        self.overruns.fetch_add(n, Ordering::Relaxed);
    }
}

// ── CaptureNode ───────────────────────────────────────────────

/// Owns the cpal input stream. Dropping it stops capture.
pub struct CaptureNode {
    _stream: Stream,
    status: CaptureStatus,
}

impl CaptureNode {
    pub fn new(
        device: &Device,
        mut producer: HeapProd<i16>,
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self, AudioError> {
        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let status = CaptureStatus::default();
        let callback_status = status.clone();
        let err_status = status.clone();

        let err_callback = move |err: cpal::StreamError| {
            tracing::error!("capture stream error: {}", err);
            err_status.set_failed();
        };

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mut dropped = 0u64;
                    for &sample in data {
                        if producer.try_push(f32_to_i16(sample)).is_err() {
                            dropped += 1;
                        }
                    }
                    if dropped > 0 {
                        callback_status.add_overruns(dropped);
                    }
                },
                err_callback,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamStart(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            status,
        })
    }

    pub fn status(&self) -> CaptureStatus {
        self.status.clone()
    }
}

// ── DeviceFrames ──────────────────────────────────────────────

/// Reads fixed frames from the consumer half of a capture ring buffer.
pub struct DeviceFrames {
    consumer: HeapCons<i16>,
    status: CaptureStatus,
    poll_interval: Duration,
    reported_overruns: u64,
}

impl DeviceFrames {
    pub fn new(consumer: HeapCons<i16>, status: CaptureStatus) -> Self {
        Self {
            consumer,
            status,
            poll_interval: Duration::from_millis(5),
            reported_overruns: 0,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait]
impl FrameSource for DeviceFrames {
    async fn read_frame(&mut self, frame: &mut [i16]) -> Result<(), AudioError> {
        loop {
            if self.status.is_failed() {
                return Err(AudioError::StreamError(
                    "input device reported an error".to_string(),
                ));
            }
            if self.consumer.occupied_len() >= frame.len() {
                self.consumer.pop_slice(frame);
                break;
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        let overruns = self.status.overruns();
        if overruns > self.reported_overruns {
            tracing::warn!(
                dropped = overruns - self.reported_overruns,
                "capture buffer overrun, samples dropped"
            );
            self.reported_overruns = overruns;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_ring_buffer;

    #[test]
    fn test_capture_status_default_ok() {
        let status = CaptureStatus::default();
        assert!(!status.is_failed());
        assert_eq!(status.overruns(), 0);
    }

    #[test]
    fn test_capture_status_clone_shares_state() {
        let s1 = CaptureStatus::default();
        let s2 = s1.clone();
        s1.set_failed();
        s1.add_overruns(3);
        assert!(s2.is_failed());
        assert_eq!(s2.overruns(), 3);
    }

    #[tokio::test]
    async fn test_device_frames_reads_in_order() {
        let (mut prod, cons) = create_ring_buffer(64);
        let mut frames = DeviceFrames::new(cons, CaptureStatus::default());
        let samples: Vec<i16> = (0..8).collect();
        prod.push_slice(&samples);

        let mut frame = [0i16; 4];
        frames.read_frame(&mut frame).await.unwrap();
        assert_eq!(frame, [0, 1, 2, 3]);
        frames.read_frame(&mut frame).await.unwrap();
        assert_eq!(frame, [4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_device_frames_waits_for_full_frame() {
        let (mut prod, cons) = create_ring_buffer(64);
        let mut frames =
            DeviceFrames::new(cons, CaptureStatus::default()).with_poll_interval(Duration::from_millis(1));
        prod.push_slice(&[1, 2]);

        let mut frame = [0i16; 4];
        let pending =
            tokio::time::timeout(Duration::from_millis(20), frames.read_frame(&mut frame)).await;
        assert!(pending.is_err(), "partial frame must not be returned");

        prod.push_slice(&[3, 4]);
        tokio::time::timeout(Duration::from_secs(2), frames.read_frame(&mut frame))
            .await
            .expect("timed out")
            .unwrap();
        assert_eq!(frame, [1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_device_frames_reports_device_failure() {
        let (_prod, cons) = create_ring_buffer(64);
        let status = CaptureStatus::default();
        let mut frames = DeviceFrames::new(cons, status.clone());
        status.set_failed();

        let mut frame = [0i16; 4];
        match frames.read_frame(&mut frame).await {
            Err(AudioError::StreamError(_)) => {}
            other => panic!("expected StreamError, got {:?}", other),
        }
    }
}
