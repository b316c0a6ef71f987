use async_trait::async_trait;
use speechpipe_core::AudioError;

/// Producer of fixed-size sample frames.
///
/// `read_frame` fills the whole slice or fails; it may wait for as long as
/// the underlying input needs and is never interrupted by cancellation.
#[async_trait]
pub trait FrameSource: Send {
    async fn read_frame(&mut self, frame: &mut [i16]) -> Result<(), AudioError>;
}

/// Append `samples` to `out` as little-endian 16-bit values.
pub fn encode_le(samples: &[i16], out: &mut Vec<u8>) {
    out.reserve(samples.len() * 2);
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
}

/// Reassemble little-endian 16-bit samples. A trailing odd byte is ignored.
pub fn decode_le(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Convert a normalized float sample to 16-bit PCM, clamping out-of-range input.
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_le_byte_order() {
        let mut out = Vec::new();
        encode_le(&[0x0102, -2], &mut out);
        assert_eq!(out, vec![0x02, 0x01, 0xFE, 0xFF]);
    }

    #[test]
    fn test_decode_le_ignores_trailing_byte() {
        assert_eq!(decode_le(&[0x02, 0x01, 0x7F]), vec![0x0102]);
    }

    #[test]
    fn test_decode_reverses_encode_at_extremes() {
        let samples = vec![i16::MIN, -1, 0, 1, i16::MAX];
        let mut bytes = Vec::new();
        encode_le(&samples, &mut bytes);
        assert_eq!(bytes.len(), samples.len() * 2);
        assert_eq!(decode_le(&bytes), samples);
    }

    #[test]
    fn test_f32_to_i16_clamps() {
        assert_eq!(f32_to_i16(0.0), 0);
        assert_eq!(f32_to_i16(1.0), i16::MAX);
        assert_eq!(f32_to_i16(2.0), i16::MAX);
        assert_eq!(f32_to_i16(-1.0), -i16::MAX);
        assert_eq!(f32_to_i16(-3.0), -i16::MAX);
    }
}
