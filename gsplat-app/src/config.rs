//! Application configuration and logging setup.

use gsplat_data::{DecodeError, ImportError, ImportSettings};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors surfaced by the command-line tool.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Import(#[from] ImportError),

    #[error("PLY decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level JSON config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub import: ImportSettings,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub enable_tracy: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_tracy: false,
        }
    }
}

pub fn init_logging(logging: &LoggingConfig) {
    #[cfg(feature = "tracy")]
    {
        if logging.enable_tracy {
            use tracing_subscriber::Layer;
            use tracing_subscriber::layer::SubscriberExt;
            use tracing_subscriber::util::SubscriberInitExt;
            tracing_subscriber::registry()
                .with(tracing_tracy::TracyLayer::default())
                .with(
                    tracing_subscriber::fmt::layer().with_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| logging.level.clone().into()),
                    ),
                )
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
