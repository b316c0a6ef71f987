use crate::constants::{DEFAULT_LANGUAGE, ENV_APP_ID, ENV_ENDPOINT, ENV_TOKEN};
use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Application id and bearer token attached to every call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    app_id: String,
    token: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            token: token.into(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value of the `authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Process-wide settings, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub credentials: Credentials,
    pub language_code: String,
    pub log_level: String,
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    endpoint: String,
    app_id: String,
    token: String,

    #[serde(default = "default_language")]
    language_code: String,

    #[serde(default = "default_log_level")]
    log_level: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").expect("interpolation pattern is valid");
    let mut result = input.to_string();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => return Err(ConfigError::EnvVarNotFound(var_name.to_string())),
        }
    }

    Ok(result)
}

fn require(field: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

impl SpeechConfig {
    /// Read `SOGOU_SPEECH_ENDPOINT`, `SOGOU_SPEECH_APPID` and `SOGOU_SPEECH_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unset and empty values are both missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::EnvVarNotFound(name.to_string()))
        };

        let endpoint = get(ENV_ENDPOINT)?;
        let app_id = get(ENV_APP_ID)?;
        let token = get(ENV_TOKEN)?;

        Ok(Self {
            endpoint,
            credentials: Credentials::new(app_id, token),
            language_code: default_language(),
            log_level: default_log_level(),
        })
    }

    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let raw: FileConfig = toml::from_str(&interpolated)?;

        Ok(Self {
            endpoint: require("endpoint", raw.endpoint)?,
            credentials: Credentials::new(
                require("app_id", raw.app_id)?,
                require("token", raw.token)?,
            ),
            language_code: require("language_code", raw.language_code)?,
            log_level: raw.log_level,
        })
    }

    pub fn with_language(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
        self
    }
}
