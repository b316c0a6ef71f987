use crate::client::AsrClient;
use async_trait::async_trait;
use speechpipe_core::proto::{
    RecognizeRequest, RecognizeResponse, StreamingRecognizeRequest, StreamingRecognizeResponse,
};
use speechpipe_core::AsrError;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};

/// Responses of an open streaming call, ending when the server closes its side.
pub type ResponseStream =
    Pin<Box<dyn Stream<Item = Result<StreamingRecognizeResponse, AsrError>> + Send>>;

/// The two calls both clients make against the recognition service.
#[async_trait]
pub trait SpeechService: Send {
    async fn recognize(&mut self, request: RecognizeRequest) -> Result<RecognizeResponse, AsrError>;

    /// Open a bidirectional call fed by `requests`. Dropping every sender of
    /// `requests` half-closes the call.
    async fn streaming_recognize(
        &mut self,
        requests: mpsc::Receiver<StreamingRecognizeRequest>,
    ) -> Result<ResponseStream, AsrError>;
}

pub fn rpc_error(status: tonic::Status) -> AsrError {
    AsrError::Rpc {
        code: format!("{:?}", status.code()),
        message: status.message().to_string(),
    }
}

#[async_trait]
impl SpeechService for AsrClient {
    async fn recognize(&mut self, request: RecognizeRequest) -> Result<RecognizeResponse, AsrError> {
        let response = AsrClient::recognize(self, request).await.map_err(rpc_error)?;
        Ok(response.into_inner())
    }

    async fn streaming_recognize(
        &mut self,
        requests: mpsc::Receiver<StreamingRecognizeRequest>,
    ) -> Result<ResponseStream, AsrError> {
        let response = AsrClient::streaming_recognize(self, ReceiverStream::new(requests))
            .await
            .map_err(rpc_error)?;
        let responses = response
            .into_inner()
            .map(|item| item.map_err(rpc_error));
        Ok(Box::pin(responses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_keeps_code_and_message() {
        let err = rpc_error(tonic::Status::unauthenticated("bad token"));
        match &err {
            AsrError::Rpc { code, message } => {
                assert_eq!(code, "Unauthenticated");
                assert_eq!(message, "bad token");
            }
            other => panic!("expected Rpc, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "remote call failed (Unauthenticated): bad token"
        );
    }
}
