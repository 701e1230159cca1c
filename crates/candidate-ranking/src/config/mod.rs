use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::ranking::config::{
    default_worker_threads, RankingConfig, DEFAULT_DEADLINE_MS, DEFAULT_PARALLEL_THRESHOLD,
};
use crate::ranking::TieBreak;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ranking: RankingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            ranking: load_ranking()?,
        })
    }
}

fn load_ranking() -> Result<RankingConfig, ConfigError> {
    let worker_threads = match env::var("RANKING_WORKER_THREADS") {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|threads| *threads > 0)
            .ok_or(ConfigError::InvalidWorkerThreads)?,
        Err(_) => default_worker_threads(),
    };

    let parallel_threshold = match env::var("RANKING_PARALLEL_THRESHOLD") {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidParallelThreshold)?,
        Err(_) => DEFAULT_PARALLEL_THRESHOLD,
    };

    let deadline_ms = match env::var("RANKING_DEADLINE_MS") {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|deadline| *deadline > 0)
            .ok_or(ConfigError::InvalidDeadline)?,
        Err(_) => DEFAULT_DEADLINE_MS,
    };

    let tie_break = match env::var("RANKING_TIE_BREAK") {
        Ok(raw) => raw
            .parse::<TieBreak>()
            .map_err(|_| ConfigError::InvalidTieBreak { value: raw })?,
        Err(_) => TieBreak::default(),
    };

    Ok(RankingConfig {
        worker_threads,
        parallel_threshold,
        deadline_ms,
        tie_break,
    })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWorkerThreads,
    InvalidParallelThreshold,
    InvalidDeadline,
    InvalidTieBreak { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWorkerThreads => {
                write!(f, "RANKING_WORKER_THREADS must be a positive integer")
            }
            ConfigError::InvalidParallelThreshold => {
                write!(f, "RANKING_PARALLEL_THRESHOLD must be a non-negative integer")
            }
            ConfigError::InvalidDeadline => {
                write!(f, "RANKING_DEADLINE_MS must be a positive number of milliseconds")
            }
            ConfigError::InvalidTieBreak { value } => write!(
                f,
                "RANKING_TIE_BREAK must be candidate_id or input_order, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWorkerThreads
            | ConfigError::InvalidParallelThreshold
            | ConfigError::InvalidDeadline
            | ConfigError::InvalidTieBreak { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("RANKING_WORKER_THREADS");
        env::remove_var("RANKING_PARALLEL_THRESHOLD");
        env::remove_var("RANKING_DEADLINE_MS");
        env::remove_var("RANKING_TIE_BREAK");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.ranking.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.ranking.deadline_ms, DEFAULT_DEADLINE_MS);
        assert_eq!(config.ranking.tie_break, TieBreak::CandidateId);
        assert!(config.ranking.worker_threads >= 1);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_ranking_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RANKING_WORKER_THREADS", "3");
        env::set_var("RANKING_PARALLEL_THRESHOLD", "0");
        env::set_var("RANKING_DEADLINE_MS", "250");
        env::set_var("RANKING_TIE_BREAK", "input_order");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.ranking.worker_threads, 3);
        assert_eq!(config.ranking.parallel_threshold, 0);
        assert_eq!(config.ranking.deadline_ms, 250);
        assert_eq!(config.ranking.tie_break, TieBreak::InputOrder);
        reset_env();
    }

    #[test]
    fn rejects_zero_workers_and_unknown_tie_break() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RANKING_WORKER_THREADS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidWorkerThreads)
        ));

        reset_env();
        env::set_var("RANKING_TIE_BREAK", "alphabetical");
        match AppConfig::load() {
            Err(ConfigError::InvalidTieBreak { value }) => assert_eq!(value, "alphabetical"),
            other => panic!("expected tie-break error, got {other:?}"),
        }
        reset_env();
    }
}
