use crate::error::ClientError;
use crate::service::SpeechService;
use speechpipe_core::proto::{
    recognition_audio, RecognitionAudio, RecognitionConfig, RecognizeRequest, RecognizeResponse,
};
use speechpipe_core::SpeechConfig;
use std::io::{self, Write};
use std::path::Path;

/// Request carrying the fixed LINEAR16/16 kHz configuration and the whole buffer.
pub fn recognize_request(config: &SpeechConfig, audio: Vec<u8>) -> RecognizeRequest {
    RecognizeRequest {
        config: Some(RecognitionConfig::linear16(&config.language_code)),
        audio: Some(RecognitionAudio {
            audio_source: Some(recognition_audio::AudioSource::Content(audio)),
        }),
    }
}

/// Print `"<transcript>" (confidence=<value>)` for every alternative, in order.
pub fn write_alternatives<W: Write>(response: &RecognizeResponse, out: &mut W) -> io::Result<usize> {
    let mut lines = 0;
    for result in &response.results {
        for alt in &result.alternatives {
            writeln!(out, "\"{}\" (confidence={:.6})", alt.transcript, alt.confidence)?;
            lines += 1;
        }
    }
    out.flush()?;
    Ok(lines)
}

/// Recognize an in-memory buffer and print its alternatives.
pub async fn recognize_audio<S, W>(
    service: &mut S,
    config: &SpeechConfig,
    audio: Vec<u8>,
    out: &mut W,
) -> Result<usize, ClientError>
where
    S: SpeechService + ?Sized,
    W: Write,
{
    let bytes = audio.len();
    let response = service.recognize(recognize_request(config, audio)).await?;
    tracing::debug!(
        bytes,
        results = response.results.len(),
        "recognize call returned"
    );
    Ok(write_alternatives(&response, out)?)
}

/// Read `path` and recognize it. The file is read before any call is made.
pub async fn recognize_file<S, W>(
    service: &mut S,
    config: &SpeechConfig,
    path: &Path,
    out: &mut W,
) -> Result<usize, ClientError>
where
    S: SpeechService + ?Sized,
    W: Write,
{
    let audio = speechpipe_audio::load_audio(path)?;
    recognize_audio(service, config, audio, out).await
}
