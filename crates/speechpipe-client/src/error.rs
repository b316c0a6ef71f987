use speechpipe_core::{AsrError, AudioError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Asr(#[from] AsrError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{task} task failed: {source}")]
    Join {
        task: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ClientError {
    pub(crate) fn join(task: &'static str) -> impl FnOnce(tokio::task::JoinError) -> Self {
        move |source| ClientError::Join { task, source }
    }
}
