use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("failed to enumerate devices: {0}")]
    DeviceEnumeration(String),

    #[error("failed to build stream: {0}")]
    StreamBuild(String),

    #[error("failed to start stream: {0}")]
    StreamStart(String),

    #[error("stream error: {0}")]
    StreamError(String),

    #[error("failed to read audio file {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("audio conduit closed: {0}")]
    ConduitClosed(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AsrError {
    #[error("could not connect to {endpoint}")]
    Connect {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid call metadata: {0}")]
    InvalidMetadata(String),

    #[error("remote call failed ({code}): {message}")]
    Rpc { code: String, message: String },

    #[error("could not recognize: code = {code}, message = {message}")]
    Recognition { code: i32, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_connect_error_keeps_its_cause() {
        let err = AsrError::Connect {
            endpoint: "https://api.example.com:443".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused").into(),
        };
        assert_eq!(err.to_string(), "could not connect to https://api.example.com:443");
        assert_eq!(err.source().unwrap().to_string(), "refused");
    }
}
