use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("{0} must be set when {1}")]
    Missing(&'static str, &'static str),
}

/// Where records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBackend {
    /// In-process store seeded with the demo tenant.
    Memory,
    /// Hosted backend at `DATA_API_URL`.
    Http,
}

/// Where the session token is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStoreKind {
    Memory,
    File,
    Redis,
}

/// How login passwords are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// Fixed demo table keyed by email.
    Demo,
    /// bcrypt against `users.passwordHash`.
    Bcrypt,
}

impl FromStr for DataBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(DataBackend::Memory),
            "http" => Ok(DataBackend::Http),
            _ => Err(()),
        }
    }
}

impl FromStr for TokenStoreKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(TokenStoreKind::Memory),
            "file" => Ok(TokenStoreKind::File),
            "redis" => Ok(TokenStoreKind::Redis),
            _ => Err(()),
        }
    }
}

impl FromStr for CredentialMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "demo" => Ok(CredentialMode::Demo),
            "bcrypt" => Ok(CredentialMode::Bcrypt),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_backend: DataBackend,
    pub data_api_url: Option<String>,
    pub data_api_key: Option<String>,
    pub token_store: TokenStoreKind,
    pub token_file: PathBuf,
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub credential_mode: CredentialMode,
    pub user_agent: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_backend: DataBackend::Memory,
            data_api_url: None,
            data_api_key: None,
            token_store: TokenStoreKind::File,
            token_file: PathBuf::from(".crm/crm_auth_token"),
            redis_url: None,
            session_ttl_secs: 24 * 3600,
            credential_mode: CredentialMode::Demo,
            user_agent: format!("crm-access/{}", env!("CARGO_PKG_VERSION")),
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

/// `24h` or `86400` (seconds).
pub fn parse_ttl(value: &str) -> Option<u64> {
    let value = value.trim();
    match value.strip_suffix('h') {
        Some(hours) => hours.parse::<u64>().ok().and_then(|h| h.checked_mul(3600)),
        None => value.parse::<u64>().ok(),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        let session_ttl_secs = match env::var("SESSION_TTL") {
            Ok(value) => parse_ttl(&value).ok_or(ConfigError::Invalid {
                key: "SESSION_TTL",
                value,
            })?,
            Err(_) => defaults.session_ttl_secs,
        };

        let config = Config {
            data_backend: parse_var("DATA_BACKEND", defaults.data_backend)?,
            data_api_url: env::var("DATA_API_URL").ok(),
            data_api_key: env::var("DATA_API_KEY").ok(),
            token_store: parse_var("TOKEN_STORE", defaults.token_store)?,
            token_file: env::var("TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_file),
            redis_url: env::var("REDIS_URL").ok(),
            session_ttl_secs,
            credential_mode: parse_var("CREDENTIALS", defaults.credential_mode)?,
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", defaults.server_port)?,
        };

        if config.data_backend == DataBackend::Http && config.data_api_url.is_none() {
            return Err(ConfigError::Missing("DATA_API_URL", "DATA_BACKEND=http"));
        }
        if config.token_store == TokenStoreKind::Redis && config.redis_url.is_none() {
            return Err(ConfigError::Missing("REDIS_URL", "TOKEN_STORE=redis"));
        }
        Ok(config)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_accepts_hours_or_seconds() {
        assert_eq!(parse_ttl("24h"), Some(86400));
        assert_eq!(parse_ttl("3600"), Some(3600));
        assert_eq!(parse_ttl("soon"), None);
    }

    #[test]
    fn ttl_rejects_hours_that_overflow_seconds() {
        assert_eq!(parse_ttl("6000000000000000h"), None);
        assert_eq!(parse_ttl(&format!("{}h", u64::MAX / 3600)), Some(u64::MAX / 3600 * 3600));
    }

    #[test]
    fn defaults_match_a_one_day_demo_session() {
        let config = Config::default();
        assert_eq!(config.session_ttl(), Duration::from_secs(86400));
        assert_eq!(config.data_backend, DataBackend::Memory);
        assert_eq!(config.credential_mode, CredentialMode::Demo);
    }

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!("HTTP".parse::<DataBackend>(), Ok(DataBackend::Http));
        assert_eq!("redis".parse::<TokenStoreKind>(), Ok(TokenStoreKind::Redis));
        assert!("ldap".parse::<CredentialMode>().is_err());
    }
}
