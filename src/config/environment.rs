use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PRACTICUM_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// One month look-back for the first status query
pub const DEFAULT_LOOKBACK_SECS: i64 = 30 * 24 * 60 * 60;
pub const DEFAULT_LOG_FILE: &str = "app.log";

/// Credentials the notifier cannot start without
pub const REQUIRED_CREDENTIALS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Environment configuration
/// Loads and validates environment variables once at startup
#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub practicum_endpoint: String,
    pub telegram_api_base: String,
    pub retry_period: Duration,
    /// Fraction of the retry period used as ± jitter; 0.0 keeps the period flat
    pub retry_jitter: f64,
    pub request_timeout: Duration,
    pub lookback_secs: i64,
    pub advance_cursor: bool,
    /// `None` disables the file sink
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    /// Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = REQUIRED_CREDENTIALS
            .iter()
            .filter(|key| get(**key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        let required = |key: &str| get(key).unwrap_or_default();

        let retry_period_secs: u64 = parse_or(&get, "RETRY_PERIOD_SECS", DEFAULT_RETRY_PERIOD_SECS)?;
        ensure_positive("RETRY_PERIOD_SECS", retry_period_secs)?;
        let request_timeout_secs: u64 =
            parse_or(&get, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        ensure_positive("REQUEST_TIMEOUT_SECS", request_timeout_secs)?;
        let lookback_secs: i64 = parse_or(&get, "LOOKBACK_SECS", DEFAULT_LOOKBACK_SECS)?;
        let advance_cursor: bool = parse_or(&get, "ADVANCE_CURSOR", false)?;

        let retry_jitter: f64 = parse_or(&get, "RETRY_JITTER", 0.0)?;
        if !(0.0..1.0).contains(&retry_jitter) {
            return Err(ConfigError::InvalidValue {
                key: "RETRY_JITTER".to_string(),
                value: retry_jitter.to_string(),
                reason: "must be in [0, 1)".to_string(),
            });
        }

        let log_file = resolve_log_file(lookup("LOG_FILE"));

        Ok(Self {
            practicum_token: required("PRACTICUM_TOKEN"),
            telegram_token: required("TELEGRAM_TOKEN"),
            telegram_chat_id: required("TELEGRAM_CHAT_ID"),
            practicum_endpoint: get("PRACTICUM_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_PRACTICUM_ENDPOINT.to_string()),
            telegram_api_base: get("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            retry_period: Duration::from_secs(retry_period_secs),
            retry_jitter,
            request_timeout: Duration::from_secs(request_timeout_secs),
            lookback_secs,
            advance_cursor,
            log_file,
        })
    }
}

fn ensure_positive(key: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: secs.to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(())
}

/// Present-but-empty `LOG_FILE` turns the file sink off
fn resolve_log_file(raw: Option<String>) -> Option<PathBuf> {
    match raw {
        Some(path) if path.trim().is_empty() => None,
        Some(path) => Some(PathBuf::from(path)),
        None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &mask(&self.practicum_token))
            .field("telegram_token", &mask(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("practicum_endpoint", &self.practicum_endpoint)
            .field("telegram_api_base", &self.telegram_api_base)
            .field("retry_period_secs", &self.retry_period.as_secs())
            .field("retry_jitter", &self.retry_jitter)
            .field("request_timeout_secs", &self.request_timeout.as_secs())
            .field("lookback_secs", &self.lookback_secs)
            .field("advance_cursor", &self.advance_cursor)
            .field("log_file", &self.log_file)
            .finish()
    }
}

fn mask(s: &str) -> String {
    match s.get(..3) {
        Some(prefix) if s.len() > 6 => format!("{}***", prefix),
        _ => "***".to_string(),
    }
}
