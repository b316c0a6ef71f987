//! gRPC client for the `sogou.speech.asr.v1.asr` service.

use crate::transport::CallCredentials;
use speechpipe_core::proto::{
    RecognizeRequest, RecognizeResponse, StreamingRecognizeRequest, StreamingRecognizeResponse,
};
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::codegen::InterceptedService;
use tonic::transport::Channel;
use tonic::Streaming;

const RECOGNIZE_PATH: &str = "/sogou.speech.asr.v1.asr/Recognize";
const STREAMING_RECOGNIZE_PATH: &str = "/sogou.speech.asr.v1.asr/StreamingRecognize";

pub type AuthenticatedChannel = InterceptedService<Channel, CallCredentials>;

#[derive(Clone)]
pub struct AsrClient {
    inner: tonic::client::Grpc<AuthenticatedChannel>,
}

impl AsrClient {
    pub fn with_credentials(channel: Channel, credentials: CallCredentials) -> Self {
        Self {
            inner: tonic::client::Grpc::new(InterceptedService::new(channel, credentials)),
        }
    }

    async fn ready(&mut self) -> Result<(), tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("service was not ready: {}", e)))
    }

    /// One request carrying the whole audio buffer, one response.
    pub async fn recognize(
        &mut self,
        request: impl tonic::IntoRequest<RecognizeRequest>,
    ) -> Result<tonic::Response<RecognizeResponse>, tonic::Status> {
        self.ready().await?;
        let codec = ProstCodec::default();
        let path = PathAndQuery::from_static(RECOGNIZE_PATH);
        self.inner.unary(request.into_request(), path, codec).await
    }

    /// Open the bidirectional stream. The call half-closes when `request` ends.
    pub async fn streaming_recognize(
        &mut self,
        request: impl tonic::IntoStreamingRequest<Message = StreamingRecognizeRequest>,
    ) -> Result<tonic::Response<Streaming<StreamingRecognizeResponse>>, tonic::Status> {
        self.ready().await?;
        let codec = ProstCodec::default();
        let path = PathAndQuery::from_static(STREAMING_RECOGNIZE_PATH);
        self.inner
            .streaming(request.into_streaming_request(), path, codec)
            .await
    }
}
