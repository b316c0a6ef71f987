pub mod client;
pub mod error;
pub mod recognize;
pub mod service;
pub mod streaming;
pub mod transport;

pub use client::AsrClient;
pub use error::ClientError;
pub use recognize::{recognize_audio, recognize_file, recognize_request, write_alternatives};
pub use service::{ResponseStream, SpeechService};
pub use streaming::{
    receive_results, send_audio, streaming_config_request, PendingCall, PipelineSummary, SendStats,
    StreamingPipeline, StreamingSession,
};
pub use transport::{connect, CallCredentials};
