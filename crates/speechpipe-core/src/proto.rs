//! Messages of the `sogou.speech.asr.v1` recognition service.
//!
//! Response types also implement `Serialize`, producing the same JSON a
//! protobuf printer would with original field names: default-valued fields
//! are omitted and enums print by name.

use crate::constants::SAMPLE_RATE_HZ;
use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum AudioEncoding {
    EncodingUnspecified = 0,
    Linear16 = 1,
    Flac = 2,
    Mulaw = 3,
    Amr = 4,
    AmrWb = 5,
    OggOpus = 6,
    SpeexWithHeaderByte = 7,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecognitionConfig {
    #[prost(enumeration = "AudioEncoding", tag = "1")]
    pub encoding: i32,
    #[prost(int32, tag = "2")]
    pub sample_rate_hertz: i32,
    #[prost(string, tag = "3")]
    pub language_code: String,
    #[prost(int32, tag = "4")]
    pub max_alternatives: i32,
    #[prost(bool, tag = "5")]
    pub profanity_filter: bool,
}

impl RecognitionConfig {
    /// 16-bit little-endian PCM at 16 kHz, the only format either client sends.
    pub fn linear16(language_code: impl Into<String>) -> Self {
        Self {
            encoding: AudioEncoding::Linear16 as i32,
            sample_rate_hertz: SAMPLE_RATE_HZ as i32,
            language_code: language_code.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecognitionAudio {
    #[prost(oneof = "recognition_audio::AudioSource", tags = "1, 2")]
    pub audio_source: Option<recognition_audio::AudioSource>,
}

pub mod recognition_audio {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum AudioSource {
        #[prost(bytes, tag = "1")]
        Content(Vec<u8>),
        #[prost(string, tag = "2")]
        Uri(String),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecognizeRequest {
    #[prost(message, optional, tag = "1")]
    pub config: Option<RecognitionConfig>,
    #[prost(message, optional, tag = "2")]
    pub audio: Option<RecognitionAudio>,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct RecognizeResponse {
    #[prost(message, repeated, tag = "2")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<SpeechRecognitionResult>,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct SpeechRecognitionResult {
    #[prost(message, repeated, tag = "1")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct SpeechRecognitionAlternative {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub transcript: String,
    #[prost(float, tag = "2")]
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub confidence: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamingRecognitionConfig {
    #[prost(message, optional, tag = "1")]
    pub config: Option<RecognitionConfig>,
    #[prost(bool, tag = "2")]
    pub single_utterance: bool,
    #[prost(bool, tag = "3")]
    pub interim_results: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamingRecognizeRequest {
    #[prost(oneof = "streaming_recognize_request::StreamingRequest", tags = "1, 2")]
    pub streaming_request: Option<streaming_recognize_request::StreamingRequest>,
}

pub mod streaming_recognize_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum StreamingRequest {
        #[prost(message, tag = "1")]
        StreamingConfig(super::StreamingRecognitionConfig),
        #[prost(bytes, tag = "2")]
        AudioContent(Vec<u8>),
    }
}

impl StreamingRecognizeRequest {
    pub fn streaming_config(config: StreamingRecognitionConfig) -> Self {
        Self {
            streaming_request: Some(
                streaming_recognize_request::StreamingRequest::StreamingConfig(config),
            ),
        }
    }

    pub fn audio_content(bytes: Vec<u8>) -> Self {
        Self {
            streaming_request: Some(streaming_recognize_request::StreamingRequest::AudioContent(
                bytes,
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SpeechEventType {
    SpeechEventUnspecified = 0,
    EndOfSingleUtterance = 1,
}

impl SpeechEventType {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            SpeechEventType::SpeechEventUnspecified => "SPEECH_EVENT_UNSPECIFIED",
            SpeechEventType::EndOfSingleUtterance => "END_OF_SINGLE_UTTERANCE",
        }
    }
}

/// `google.rpc.Status`, without details.
#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct Status {
    #[prost(int32, tag = "1")]
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub code: i32,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct StreamingRecognizeResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    #[prost(message, repeated, tag = "2")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<StreamingRecognitionResult>,
    #[prost(enumeration = "SpeechEventType", tag = "4")]
    #[serde(
        skip_serializing_if = "is_zero_i32",
        serialize_with = "serialize_speech_event"
    )]
    pub speech_event_type: i32,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct StreamingRecognitionResult {
    #[prost(message, repeated, tag = "1")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<SpeechRecognitionAlternative>,
    #[prost(bool, tag = "2")]
    #[serde(skip_serializing_if = "is_false")]
    pub is_final: bool,
    #[prost(float, tag = "3")]
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub stability: f32,
}

impl StreamingRecognizeResponse {
    /// Render as one JSON record.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn is_zero_f32(v: &f32) -> bool {
    *v == 0.0
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn serialize_speech_event<S: Serializer>(value: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    match SpeechEventType::try_from(*value) {
        Ok(event) => serializer.serialize_str(event.as_str_name()),
        Err(_) => serializer.serialize_i32(*value),
    }
}
