use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CLASSIFIER_SCRIPT: &str = "ml_service/scripts/predict.py";
const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// How to launch the classifier worker.
///
/// The worker is run as `program [script] <text>`.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub program: String,
    pub script: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            program: default_program().to_string(),
            script: Some(PathBuf::from(DEFAULT_CLASSIFIER_SCRIPT)),
            timeout: Duration::from_secs(DEFAULT_CLASSIFIER_TIMEOUT_SECS),
        }
    }
}

fn default_program() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub classifier: ClassifierConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            classifier: ClassifierConfig::default(),
            cors_allowed_origins: split_origins(DEFAULT_CORS_ORIGINS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();

        let port = match get("PORT") {
            Some(v) => parse_number(&v, "PORT")?,
            None => defaults.port,
        };
        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => parse_number(&v, "DATABASE_MAX_CONNECTIONS")?,
            None => defaults.max_connections,
        };
        let timeout = match get("CLASSIFIER_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number(&v, "CLASSIFIER_TIMEOUT_SECS")?),
            None => defaults.classifier.timeout,
        };
        // An explicitly empty CLASSIFIER_SCRIPT means the program takes the text directly.
        let script = match lookup("CLASSIFIER_SCRIPT") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(PathBuf::from(v)),
            None => defaults.classifier.script,
        };

        let config = Self {
            port,
            database_url: get("DATABASE_URL"),
            max_connections,
            classifier: ClassifierConfig {
                program: get("CLASSIFIER_PROGRAM").unwrap_or(defaults.classifier.program),
                script,
                timeout,
            },
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or(defaults.cors_allowed_origins),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.classifier.timeout.is_zero() {
            return Err(AppError::Config("CLASSIFIER_TIMEOUT_SECS must be greater than 0".into()));
        }
        if self.max_connections == 0 {
            return Err(AppError::Config("DATABASE_MAX_CONNECTIONS must be greater than 0".into()));
        }
        if self.classifier.program.trim().is_empty() {
            return Err(AppError::Config("CLASSIFIER_PROGRAM cannot be empty".into()));
        }
        for origin in &self.cors_allowed_origins {
            if origin.parse::<http::HeaderValue>().is_err() {
                return Err(AppError::Config(format!("Invalid CORS origin: {}", origin)));
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", key, value)))
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
