pub mod toml_config;

use crate::utils::error::{RelayError, Result};
use crate::utils::validation::Validate;
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use toml_config::TomlConfig;
use url::Url;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone, Parser)]
#[command(name = "lead-relay")]
#[command(about = "Relays lead form submissions to Telegram chats")]
pub struct CliConfig {
    #[arg(long, env = "RELAY_HOST", help = "Address to listen on [default: 0.0.0.0]")]
    pub host: Option<String>,

    #[arg(long, env = "PORT", help = "Port to listen on [default: 8787]")]
    pub port: Option<u16>,

    #[arg(long, env = "TG_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    #[arg(long, env = "TG_CHAT_IDS", help = "Comma-separated recipient chat ids")]
    pub chat_ids: Option<String>,

    #[arg(long, env = "TG_API_BASE", help = "Messaging API base URL")]
    pub api_base: Option<String>,

    #[arg(long, env = "MAX_BODY_BYTES", help = "Largest accepted lead body")]
    pub max_body_bytes: Option<usize>,

    #[arg(long, env = "RELAY_CONFIG", help = "Optional TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, env = "LOG_JSON", help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// Resolved process configuration. Built once at startup and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub bot_token: String,
    pub chat_ids: Vec<String>,
    pub api_base: String,
    pub max_body_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            bot_token: String::new(),
            chat_ids: Vec::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RelayConfig {
    /// Flags and environment win over the config file, which wins over defaults.
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        Ok(Self::merge(cli, file))
    }

    fn merge(cli: &CliConfig, file: TomlConfig) -> Self {
        let defaults = Self::default();
        let server = file.server.unwrap_or_default();
        let telegram = file.telegram.unwrap_or_default();

        let chat_ids = match &cli.chat_ids {
            Some(raw) => parse_chat_ids(raw),
            None => telegram
                .chat_ids
                .unwrap_or_default()
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        };

        Self {
            host: cli.host.clone().or(server.host).unwrap_or(defaults.host),
            port: cli.port.or(server.port).unwrap_or(defaults.port),
            bot_token: cli
                .bot_token
                .clone()
                .or(telegram.bot_token)
                .unwrap_or(defaults.bot_token),
            chat_ids,
            api_base: cli
                .api_base
                .clone()
                .or(telegram.api_base)
                .unwrap_or(defaults.api_base),
            max_body_bytes: cli
                .max_body_bytes
                .or(server.max_body_bytes)
                .unwrap_or(defaults.max_body_bytes),
        }
    }

    /// Dispatch is only possible with a token and at least one recipient.
    pub fn telegram_ready(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_ids.is_empty()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "bot_token",
                &if self.bot_token.is_empty() { "<empty>" } else { "<redacted>" },
            )
            .field("chat_ids", &self.chat_ids)
            .field("api_base", &self.api_base)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", &self.host, "Listen address cannot be empty"));
        }

        match Url::parse(&self.api_base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(invalid(
                    "api_base",
                    &self.api_base,
                    &format!("Unsupported URL scheme: {}", url.scheme()),
                ));
            }
            Err(e) => {
                return Err(invalid(
                    "api_base",
                    &self.api_base,
                    &format!("Invalid URL format: {}", e),
                ));
            }
        }

        if self.max_body_bytes == 0 {
            return Err(invalid(
                "max_body_bytes",
                "0",
                "Body limit must be at least 1 byte",
            ));
        }

        if !self.telegram_ready() {
            tracing::warn!(
                "Telegram token or chat ids are missing, /api/lead will answer 500 until configured"
            );
        }

        Ok(())
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> RelayError {
    RelayError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Splits a comma-separated recipient list, dropping blank entries.
pub fn parse_chat_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
