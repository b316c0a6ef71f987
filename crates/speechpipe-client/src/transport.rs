use crate::client::AsrClient;
use speechpipe_core::{AsrError, Credentials, SpeechConfig};
use tonic::metadata::AsciiMetadataValue;
use tonic::service::Interceptor;
use tonic::transport::{ClientTlsConfig, Endpoint};

/// Attaches `appid` and `authorization: Bearer <token>` to every call.
#[derive(Clone)]
pub struct CallCredentials {
    app_id: AsciiMetadataValue,
    authorization: AsciiMetadataValue,
}

impl CallCredentials {
    pub fn new(credentials: &Credentials) -> Result<Self, AsrError> {
        let app_id = credentials
            .app_id()
            .parse::<AsciiMetadataValue>()
            .map_err(|e| AsrError::InvalidMetadata(format!("appid: {}", e)))?;
        let mut authorization = credentials
            .bearer()
            .parse::<AsciiMetadataValue>()
            .map_err(|e| AsrError::InvalidMetadata(format!("authorization: {}", e)))?;
        authorization.set_sensitive(true);

        Ok(Self {
            app_id,
            authorization,
        })
    }
}

impl Interceptor for CallCredentials {
    fn call(&mut self, mut request: tonic::Request<()>) -> Result<tonic::Request<()>, tonic::Status> {
        let metadata = request.metadata_mut();
        metadata.insert("appid", self.app_id.clone());
        metadata.insert("authorization", self.authorization.clone());
        Ok(request)
    }
}

/// Endpoints without a scheme are dialed over TLS.
pub fn endpoint_uri(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    }
}

/// Dial the configured endpoint and wait until the connection is established.
///
/// `https://` endpoints (and bare `host:port`) use TLS with the system roots;
/// an explicit `http://` endpoint is dialed in plaintext.
pub async fn connect(config: &SpeechConfig) -> Result<AsrClient, AsrError> {
    let credentials = CallCredentials::new(&config.credentials)?;
    let uri = endpoint_uri(&config.endpoint);

    let connect_error = |e: tonic::transport::Error| AsrError::Connect {
        endpoint: uri.clone(),
        source: Box::new(e),
    };

    let mut endpoint = Endpoint::from_shared(uri.clone()).map_err(connect_error)?;
    if uri.starts_with("https://") {
        endpoint = endpoint
            .tls_config(ClientTlsConfig::new().with_native_roots())
            .map_err(connect_error)?;
    }

    tracing::debug!(endpoint = %uri, "connecting");
    let channel = endpoint
        .connect()
        .await
        .map_err(connect_error)?;
    tracing::info!(endpoint = %uri, "connected");

    Ok(AsrClient::with_credentials(channel, credentials))
}
