pub mod config;
pub mod constants;
pub mod error;
pub mod proto;

pub use config::{Credentials, SpeechConfig};
pub use error::{AsrError, AudioError, ConfigError};
