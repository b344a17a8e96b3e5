//! Environment-driven configuration for the coplay batch job

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Jsonl,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Tsv,
    Sqlite,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct CoplayConfig {
    pub input: InputSource,
    pub backend: BackendType,
    pub sessions_tsv_path: PathBuf,
    pub sessions_db_path: PathBuf,
    pub output_path: PathBuf,
    pub max_session_duration_secs: i64,
    pub min_server_sessions: usize,
    pub significance_threshold_secs: i64,
    pub disable_significance_filter: bool,
    pub include_self_pairs: bool,
    pub worker_count: usize,
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> T {
    env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_flag(var: &str) -> bool {
    env::var(var)
        .unwrap_or_else(|_| "false".to_string())
        .to_lowercase()
        .parse::<bool>()
        .unwrap_or(false)
}

impl CoplayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let input = Self::parse_input_from_args();
        let backend = Self::parse_backend_from_args();

        let output_path = match backend {
            BackendType::Sqlite => {
                env::var("COPLAY_OUTPUT_PATH").unwrap_or_else(|_| "data/coplay.db".to_string())
            }
            BackendType::Jsonl => {
                env::var("COPLAY_OUTPUT_PATH").unwrap_or_else(|_| "streams/coplay".to_string())
            }
        };

        let config = Self {
            input,
            backend,
            sessions_tsv_path: env::var("SESSIONS_TSV_PATH")
                .unwrap_or_else(|_| "data/sessions.tsv".to_string())
                .into(),
            sessions_db_path: env::var("SESSIONS_DB_PATH")
                .unwrap_or_else(|_| "data/sessions.db".to_string())
                .into(),
            output_path: output_path.into(),
            max_session_duration_secs: env_parse("MAX_SESSION_DURATION_SECS", 86400),
            min_server_sessions: env_parse("MIN_SERVER_SESSIONS", 2),
            significance_threshold_secs: env_parse("SIGNIFICANCE_THRESHOLD_SECS", 10800),
            disable_significance_filter: env_flag("DISABLE_SIGNIFICANCE_FILTER"),
            include_self_pairs: env_flag("INCLUDE_SELF_PAIRS"),
            worker_count: env_parse("WORKER_COUNT", 1),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn parse_backend_from_args() -> BackendType {
        let args: Vec<String> = env::args().collect();
        if let Some(idx) = args.iter().position(|x| x == "--backend") {
            match args.get(idx + 1).map(|s| s.as_str()) {
                Some("sqlite") => return BackendType::Sqlite,
                Some("jsonl") => return BackendType::Jsonl,
                _ => {}
            }
        }
        BackendType::Jsonl // Default to JSONL
    }

    pub fn parse_input_from_args() -> InputSource {
        let args: Vec<String> = env::args().collect();
        if let Some(idx) = args.iter().position(|x| x == "--input") {
            match args.get(idx + 1).map(|s| s.as_str()) {
                Some("sqlite") => return InputSource::Sqlite,
                Some("tsv") => return InputSource::Tsv,
                _ => {}
            }
        }
        InputSource::Tsv // Default to the bulk TSV dump
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_session_duration_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_SESSION_DURATION_SECS must be positive".to_string(),
            ));
        }
        if self.min_server_sessions < 2 {
            return Err(ConfigError::InvalidValue(
                "MIN_SERVER_SESSIONS below 2 cannot produce overlap".to_string(),
            ));
        }
        if self.significance_threshold_secs < 0 {
            return Err(ConfigError::InvalidValue(
                "SIGNIFICANCE_THRESHOLD_SECS cannot be negative".to_string(),
            ));
        }
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidValue(
                "WORKER_COUNT must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> CoplayConfig {
        CoplayConfig {
            input: InputSource::Tsv,
            backend: BackendType::Jsonl,
            sessions_tsv_path: "data/sessions.tsv".into(),
            sessions_db_path: "data/sessions.db".into(),
            output_path: "streams/coplay".into(),
            max_session_duration_secs: 86400,
            min_server_sessions: 2,
            significance_threshold_secs: 10800,
            disable_significance_filter: false,
            include_self_pairs: false,
            worker_count: 1,
        }
    }

    #[test]
    fn test_default_config_validates() {
        assert!(default_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_workers() {
        let mut config = default_config();
        config.worker_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_viable_minimum() {
        let mut config = default_config();
        config.min_server_sessions = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let mut config = default_config();
        config.significance_threshold_secs = -1;
        assert!(config.validate().is_err());
    }
}
