//! Live recognition: capture → conduit → send, with results received concurrently.
//!
//! The capture task writes frames into the byte conduit and closes it once
//! cancelled. The send task forwards conduit bytes as `audio_content` messages
//! and half-closes the call when the conduit reports end-of-data. The receive
//! task prints every response until the server closes the stream.

use crate::error::ClientError;
use crate::service::{ResponseStream, SpeechService};
use speechpipe_audio::{byte_conduit, capture_frames, CaptureStats, FrameSource};
use speechpipe_core::constants::{CONDUIT_CAPACITY_BYTES, FRAME_SAMPLES, SEND_CHUNK_BYTES};
use speechpipe_core::proto::{
    RecognitionConfig, StreamingRecognitionConfig, StreamingRecognizeRequest,
};
use speechpipe_core::{AsrError, AudioError, SpeechConfig};
use std::future::Future;
use std::io::{ErrorKind, Write};
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio_stream::StreamExt;

/// Outbound messages buffered ahead of the transport.
const REQUEST_QUEUE_DEPTH: usize = 16;

/// Consecutive conduit read failures tolerated before the send task gives up.
pub const MAX_CONSECUTIVE_READ_ERRORS: u32 = 8;

/// First message of every stream: LINEAR16, 16 kHz, interim results on.
pub fn streaming_config_request(config: &SpeechConfig) -> StreamingRecognizeRequest {
    StreamingRecognizeRequest::streaming_config(StreamingRecognitionConfig {
        config: Some(RecognitionConfig::linear16(&config.language_code)),
        single_utterance: false,
        interim_results: true,
    })
}

/// Opens the bidirectional call once awaited.
pub type PendingCall = Pin<Box<dyn Future<Output = Result<ResponseStream, AsrError>> + Send>>;

/// A streaming call with its configuration message queued and the call
/// itself not yet opened.
///
/// Opening is deferred to the receive task: a server may hold back its
/// response headers until it has heard audio, so the send side must already
/// be running when the call is awaited.
pub struct StreamingSession {
    requests: mpsc::Sender<StreamingRecognizeRequest>,
    call: PendingCall,
}

impl StreamingSession {
    pub fn open<S>(mut service: S, config: &SpeechConfig) -> Result<Self, ClientError>
    where
        S: SpeechService + 'static,
    {
        let (requests, outbound) = mpsc::channel(REQUEST_QUEUE_DEPTH);

        // Queued before the call starts so it precedes any audio on the wire.
        requests
            .try_send(streaming_config_request(config))
            .map_err(|_| AsrError::Rpc {
                code: "Internal".to_string(),
                message: "request stream closed before configuration".to_string(),
            })?;
        tracing::debug!(language = %config.language_code, "streaming configuration queued");

        let call: PendingCall =
            Box::pin(async move { service.streaming_recognize(outbound).await });

        Ok(Self { requests, call })
    }

    pub fn into_parts(self) -> (mpsc::Sender<StreamingRecognizeRequest>, PendingCall) {
        (self.requests, self.call)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendStats {
    pub chunks: u64,
    pub bytes: u64,
    pub send_failures: u64,
    pub read_failures: u64,
}

/// Forward conduit bytes as audio messages until end-of-data, then half-close.
///
/// Send failures are logged and skipped. Read failures are logged and retried
/// up to [`MAX_CONSECUTIVE_READ_ERRORS`] times in a row, after which the
/// conduit is treated as finished.
pub async fn send_audio<R>(
    mut reader: R,
    requests: mpsc::Sender<StreamingRecognizeRequest>,
    chunk_bytes: usize,
) -> SendStats
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; chunk_bytes];
    let mut stats = SendStats::default();
    let mut consecutive_errors = 0u32;

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                consecutive_errors = 0;
                let message = StreamingRecognizeRequest::audio_content(buf[..n].to_vec());
                if requests.send(message).await.is_err() {
                    stats.send_failures += 1;
                    tracing::warn!(bytes = n, "could not send audio: call already closed");
                } else {
                    stats.chunks += 1;
                    stats.bytes += n as u64;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                stats.read_failures += 1;
                consecutive_errors += 1;
                tracing::warn!("could not read audio: {}", e);
                if consecutive_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                    tracing::error!(
                        attempts = consecutive_errors,
                        "giving up on audio conduit after repeated read errors"
                    );
                    break;
                }
            }
        }
    }

    drop(requests);
    tracing::info!(
        chunks = stats.chunks,
        bytes = stats.bytes,
        "audio finished, stream half-closed"
    );
    stats
}

/// Print each response as one JSON line until the server ends the stream.
///
/// A response carrying an error payload ends the loop with an error before
/// it is printed.
pub async fn receive_results<W: Write>(
    mut responses: ResponseStream,
    out: &mut W,
) -> Result<usize, ClientError> {
    let mut printed = 0;

    while let Some(item) = responses.next().await {
        let response = item?;
        if let Some(status) = &response.error {
            return Err(AsrError::Recognition {
                code: status.code,
                message: status.message.clone(),
            }
            .into());
        }
        writeln!(out, "{}", response.to_json()?)?;
        out.flush()?;
        printed += 1;
    }

    tracing::info!(results = printed, "server closed the result stream");
    Ok(printed)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub capture: CaptureStats,
    pub send: SendStats,
    pub results: usize,
}

async fn join_opt<T>(handle: Option<&mut JoinHandle<T>>) -> Result<T, JoinError> {
    match handle {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Owns the capture, send and receive tasks of one streaming call.
pub struct StreamingPipeline {
    cancel: watch::Sender<bool>,
    capture: Option<JoinHandle<Result<CaptureStats, AudioError>>>,
    send: JoinHandle<SendStats>,
    receive: Option<JoinHandle<Result<usize, ClientError>>>,
    capture_stats: CaptureStats,
    results: usize,
}

impl StreamingPipeline {
    pub fn start<F, W>(session: StreamingSession, source: F, out: W) -> Self
    where
        F: FrameSource + 'static,
        W: Write + Send + 'static,
    {
        Self::start_with_capacity(session, source, out, CONDUIT_CAPACITY_BYTES)
    }

    pub fn start_with_capacity<F, W>(
        session: StreamingSession,
        source: F,
        mut out: W,
        conduit_capacity: usize,
    ) -> Self
    where
        F: FrameSource + 'static,
        W: Write + Send + 'static,
    {
        let (cancel, cancel_rx) = watch::channel(false);
        let (writer, reader) = byte_conduit(conduit_capacity);
        let (requests, call) = session.into_parts();

        let capture = tokio::spawn(capture_frames(source, writer, cancel_rx, FRAME_SAMPLES));
        let send = tokio::spawn(send_audio(reader, requests, SEND_CHUNK_BYTES));
        let receive = tokio::spawn(async move {
            let responses = call.await?;
            tracing::info!("streaming call opened");
            receive_results(responses, &mut out).await
        });

        Self {
            cancel,
            capture: Some(capture),
            send,
            receive: Some(receive),
            capture_stats: CaptureStats::default(),
            results: 0,
        }
    }

    /// Wait until the server closes the result stream.
    ///
    /// Returns early with an error if capture or receive fails. Safe to drop
    /// before completion; the tasks keep running.
    pub async fn closed(&mut self) -> Result<(), ClientError> {
        while self.receive.is_some() {
            tokio::select! {
                joined = join_opt(self.capture.as_mut()) => {
                    self.capture = None;
                    self.capture_stats = joined.map_err(ClientError::join("capture"))??;
                }
                joined = join_opt(self.receive.as_mut()) => {
                    self.receive = None;
                    self.results = joined.map_err(ClientError::join("receive"))??;
                }
            }
        }
        Ok(())
    }

    /// Cancel capture and wait for all three tasks.
    ///
    /// Capture stops after its current frame and closes the conduit; the send
    /// task drains what was written, half-closes, and the receive task ends
    /// when the server closes its side. If capture failed, the send task is
    /// still drained but the receive task is aborted.
    pub async fn shutdown(mut self) -> Result<PipelineSummary, ClientError> {
        let _ = self.cancel.send(true);

        let captured = match self.capture.take() {
            Some(capture) => match capture.await {
                Ok(res) => res.map_err(ClientError::from),
                Err(e) => Err(ClientError::join("capture")(e)),
            },
            None => Ok(self.capture_stats),
        };
        let send = self.send.await.map_err(ClientError::join("send"));

        let receive = self.receive.take();
        self.capture_stats = match captured {
            Ok(stats) => stats,
            Err(e) => {
                if let Some(receive) = receive {
                    receive.abort();
                }
                return Err(e);
            }
        };
        let send = send?;
        if let Some(receive) = receive {
            self.results = receive.await.map_err(ClientError::join("receive"))??;
        }

        Ok(PipelineSummary {
            capture: self.capture_stats,
            send,
            results: self.results,
        })
    }
}
