//! Fixed audio format and framing parameters.

/// Every request declares 16 kHz mono LINEAR16.
pub const SAMPLE_RATE_HZ: u32 = 16_000;

pub const CHANNELS: u16 = 1;

pub const BYTES_PER_SAMPLE: usize = 2;

/// Samples per captured frame (100 ms).
pub const FRAME_SAMPLES: usize = 1_600;

/// Upper bound on bytes per `audio_content` message.
pub const SEND_CHUNK_BYTES: usize = 3_200;

/// Conduit capacity between capture and send (one second of audio).
pub const CONDUIT_CAPACITY_BYTES: usize = SAMPLE_RATE_HZ as usize * BYTES_PER_SAMPLE;

pub const DEFAULT_LANGUAGE: &str = "zh-cmn-Hans-CN";

pub const ENV_ENDPOINT: &str = "SOGOU_SPEECH_ENDPOINT";
pub const ENV_APP_ID: &str = "SOGOU_SPEECH_APPID";
pub const ENV_TOKEN: &str = "SOGOU_SPEECH_TOKEN";
