//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 10000;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TEMPLATE_PATH: &str = "03cad_pechat.pdf";
const DEFAULT_OUTPUT_DIR: &str = ".";
const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// How updates reach the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Telegram pushes updates to our HTTP endpoint.
    Webhook {
        public_url: String,
        secret_token: Option<String>,
        listen_addr: String,
        port: u16,
    },
    /// We long-poll `getUpdates`.
    Polling { timeout_secs: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub bot_token: String,
    pub api_url: String,
    pub transport: Transport,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub session_idle_timeout: Duration,
}

impl BotConfig {
    /// Read configuration from the process environment (after `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let webhook_url = get("WEBHOOK_URL");

        let transport_kind = match get("BOT_TRANSPORT") {
            Some(kind) => kind.to_ascii_lowercase(),
            None if webhook_url.is_some() => "webhook".to_string(),
            None => "polling".to_string(),
        };

        let transport = match transport_kind.as_str() {
            "webhook" => Transport::Webhook {
                public_url: webhook_url.ok_or(ConfigError::Missing("WEBHOOK_URL"))?,
                secret_token: get("WEBHOOK_SECRET"),
                listen_addr: get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
                port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            },
            "polling" => Transport::Polling {
                timeout_secs: parse_or(
                    "POLL_TIMEOUT_SECS",
                    get("POLL_TIMEOUT_SECS"),
                    DEFAULT_POLL_TIMEOUT_SECS,
                )?,
            },
            _ => {
                return Err(ConfigError::Invalid {
                    key: "BOT_TRANSPORT",
                    value: transport_kind.clone(),
                })
            }
        };

        let session_idle_secs = parse_or(
            "SESSION_IDLE_SECS",
            get("SESSION_IDLE_SECS"),
            DEFAULT_SESSION_IDLE_SECS,
        )?;

        Ok(Self {
            bot_token,
            api_url: get("TELEGRAM_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            transport,
            template_path: get("TEMPLATE_PATH")
                .unwrap_or_else(|| DEFAULT_TEMPLATE_PATH.to_string())
                .into(),
            output_dir: get("OUTPUT_DIR")
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string())
                .into(),
            session_idle_timeout: Duration::from_secs(session_idle_secs),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
