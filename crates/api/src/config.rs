use std::env;

use axum::http::HeaderValue;
use bankdesk_core::BillPolicy;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;

const PORT_KEY: &str = "CHATBOT_PORT";
const BIND_HOST_KEY: &str = "CHATBOT_BIND_HOST";
const ALLOWED_ORIGINS_KEY: &str = "CHATBOT_ALLOWED_ORIGINS";
const BILL_PAYMENTS_KEY: &str = "CHATBOT_BILL_PAYMENTS";
const MAX_BODY_BYTES_KEY: &str = "CHATBOT_MAX_BODY_BYTES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatbotConfig {
    pub bind_host: String,
    pub port: u16,
    pub allowed_origins: AllowedOrigins,
    pub bill_policy: BillPolicy,
    pub max_body_bytes: usize,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: AllowedOrigins::Any,
            bill_policy: BillPolicy::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ChatbotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match read(PORT_KEY) {
            Some(value) => value
                .parse::<u16>()
                .ok()
                .filter(|port| *port > 0)
                .ok_or(ConfigError::InvalidPort {
                    key: PORT_KEY,
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        let max_body_bytes = match read(MAX_BODY_BYTES_KEY) {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidBodyLimit {
                    key: MAX_BODY_BYTES_KEY,
                    value,
                })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let bill_policy = match read(BILL_PAYMENTS_KEY) {
            Some(value) => value
                .parse::<BillPolicy>()
                .map_err(|source| ConfigError::BillPolicy {
                    key: BILL_PAYMENTS_KEY,
                    source,
                })?,
            None => BillPolicy::default(),
        };

        Ok(Self {
            bind_host: read(BIND_HOST_KEY).unwrap_or_else(|| DEFAULT_BIND_HOST.to_string()),
            port,
            allowed_origins: parse_allowed_origins(read(ALLOWED_ORIGINS_KEY))?,
            bill_policy,
            max_body_bytes,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn parse_allowed_origins(value: Option<String>) -> Result<AllowedOrigins, ConfigError> {
    let Some(value) = value else {
        return Ok(AllowedOrigins::Any);
    };

    let origins = value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect::<Vec<_>>();

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return Ok(AllowedOrigins::Any);
    }

    if let Some(bad) = origins
        .iter()
        .find(|origin| HeaderValue::from_str(origin).is_err())
    {
        return Err(ConfigError::InvalidOrigin {
            key: ALLOWED_ORIGINS_KEY,
            value: bad.clone(),
        });
    }

    Ok(AllowedOrigins::List(origins))
}
