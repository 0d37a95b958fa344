use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::composer::MAX_CARD_PAYLOAD_BYTES;

/// Version reported by the debug and health endpoints.
pub const CODE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("GOOGLE_APPLICATION_CREDENTIALS is required in the local environment")]
    MissingLocalCredentials,

    #[error("service account key file not found: {}", .0.display())]
    CredentialsFileNotFound(PathBuf),

    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Local,
    Cloud,
}

/// Process configuration. Read once at startup and passed down explicitly; nothing in
/// the crate reads the environment after this is built.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "searchbot",
    version,
    about = "Chat bot front-end for enterprise document search"
)]
pub struct Config {
    #[arg(long, env = "PROJECT_ID")]
    pub project_id: String,

    #[arg(long, env = "LOCATION")]
    pub location: String,

    #[arg(long, env = "SEARCH_ENGINE_ID")]
    pub search_engine_id: String,

    #[arg(
        long,
        env = "ENVIRONMENT",
        value_enum,
        ignore_case = true,
        default_value = "cloud"
    )]
    pub environment: Environment,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Service account key file. Required locally; in the cloud the runtime's default
    /// credentials are used when unset.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials_file: Option<PathBuf>,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Display name of the bot, stripped from incoming mentions.
    #[arg(long, env = "BOT_NAME", default_value = "Vertex AI Search Bot")]
    pub bot_name: String,

    #[arg(long, env = "PAGE_SIZE", default_value_t = 10)]
    pub page_size: u32,

    #[arg(long, env = "SUMMARY_RESULT_COUNT", default_value_t = 5)]
    pub summary_result_count: u32,

    #[arg(long, env = "SEARCH_TIMEOUT_SECS", default_value_t = 30)]
    pub search_timeout_secs: u64,

    #[arg(long, env = "DEBUG_DEFAULT_QUERY", default_value = "price import")]
    pub debug_default_query: String,

    #[arg(long, env = "MAX_CARD_BYTES", default_value_t = MAX_CARD_PAYLOAD_BYTES)]
    pub max_card_bytes: usize,
}

impl Config {
    /// Loads `.env` when present, then parses flags and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("PROJECT_ID", &self.project_id),
            ("LOCATION", &self.location),
            ("SEARCH_ENGINE_ID", &self.search_engine_id),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Missing(*name));
        }

        if self.is_local() {
            match &self.credentials_file {
                None => return Err(ConfigError::MissingLocalCredentials),
                Some(path) if !path.is_file() => {
                    return Err(ConfigError::CredentialsFileNotFound(path.clone()));
                }
                Some(_) => {}
            }
        }

        if self.bot_name.trim().is_empty() {
            return Err(ConfigError::Missing("BOT_NAME"));
        }

        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "PAGE_SIZE",
                reason: "must be at least 1".into(),
            });
        }

        self.socket_addr()?;
        Ok(())
    }

    pub fn is_local(&self) -> bool {
        self.environment == Environment::Local
    }

    pub fn is_cloud(&self) -> bool {
        self.environment == Environment::Cloud
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}
