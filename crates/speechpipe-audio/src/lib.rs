pub mod capture;
pub mod conduit;
pub mod device;
pub mod frame;
pub mod pump;

pub use capture::{CaptureNode, CaptureStatus, DeviceFrames};
pub use conduit::{byte_conduit, ConduitReader, ConduitWriter};
pub use device::DeviceManager;
pub use frame::{decode_le, encode_le, FrameSource};
pub use pump::{capture_frames, CaptureStats};

use ringbuf::traits::Split;
use ringbuf::{HeapCons, HeapProd, HeapRb};
use speechpipe_core::constants::{CHANNELS, SAMPLE_RATE_HZ};
use speechpipe_core::AudioError;
use std::path::Path;

/// Create a ring buffer split into producer and consumer halves.
pub fn create_ring_buffer(capacity: usize) -> (HeapProd<i16>, HeapCons<i16>) {
    HeapRb::<i16>::new(capacity).split()
}

/// Open the named input device at 16 kHz mono and start capturing.
///
/// The returned node must outlive the frame source; dropping it stops the
/// device stream.
pub fn open_capture(
    manager: &DeviceManager,
    device_name: &str,
) -> Result<(CaptureNode, DeviceFrames), AudioError> {
    let device = manager.get_input_device(device_name)?;

    // ~2 seconds of audio
    let (producer, consumer) = create_ring_buffer(SAMPLE_RATE_HZ as usize * 2);
    let node = CaptureNode::new(&device, producer, SAMPLE_RATE_HZ, CHANNELS)?;
    let frames = DeviceFrames::new(consumer, node.status());
    Ok((node, frames))
}

/// Read a raw PCM file. The contents are not validated.
pub fn load_audio(path: &Path) -> Result<Vec<u8>, AudioError> {
    let data = std::fs::read(path).map_err(|source| AudioError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    if data.len() % 2 != 0 {
        tracing::warn!(
            path = %path.display(),
            len = data.len(),
            "audio file has an odd byte count; expected 16-bit samples"
        );
    }
    Ok(data)
}
