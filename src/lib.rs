//! Setup shared by the `recognize` and `streaming-recognize` binaries.

use anyhow::{Context, Result};
use clap::Args;
use speechpipe_core::{ConfigError, SpeechConfig};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// TOML file with endpoint and credentials, used instead of the environment
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Language tag sent with every request
    #[arg(short, long)]
    pub language: Option<String>,

    /// Tracing filter, e.g. "debug" or "speechpipe_client=trace"
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CommonArgs {
    /// Build the process configuration from `--config` or the environment.
    pub fn resolve(&self) -> Result<SpeechConfig, ConfigError> {
        let config = match &self.config {
            Some(path) => SpeechConfig::load_from_file(path)?,
            None => SpeechConfig::from_env()?,
        };
        Ok(match &self.language {
            Some(language) => config.with_language(language.as_str()),
            None => config,
        })
    }

    pub fn log_filter<'a>(&'a self, config: &'a SpeechConfig) -> &'a str {
        self.log_level.as_deref().unwrap_or(&config.log_level)
    }
}

/// Install a stderr fmt subscriber. `RUST_LOG` wins over `filter` when set.
pub fn init_tracing(filter: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

/// Resolve on SIGINT or, on Unix, SIGTERM.
pub async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
