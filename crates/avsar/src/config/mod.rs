use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::matching::EngineConfig;

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

/// Top-level configuration for the matching service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("AVSAR_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("AVSAR_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("AVSAR_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("AVSAR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: engine_from_env()?,
        })
    }
}

/// Engine tunables start from [`EngineConfig::default`]; each `AVSAR_*`
/// variable overrides one field when present.
fn engine_from_env() -> Result<EngineConfig, ConfigError> {
    let mut engine = EngineConfig::default();
    override_from_env(&mut engine.marginal_tolerance, "AVSAR_MARGINAL_TOLERANCE")?;
    override_from_env(&mut engine.age_marginal_years, "AVSAR_AGE_MARGINAL_YEARS")?;
    override_from_env(&mut engine.deadline_decay, "AVSAR_DEADLINE_DECAY")?;
    override_from_env(&mut engine.thresholds_enabled, "AVSAR_THRESHOLDS_ENABLED")?;
    override_from_env(&mut engine.cache_capacity, "AVSAR_CACHE_CAPACITY")?;
    Ok(engine)
}

fn override_from_env<T: FromStr>(target: &mut T, name: &'static str) -> Result<(), ConfigError> {
    if let Ok(raw) = env::var(name) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTunable { name })?;
    }
    Ok(())
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTunable { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "AVSAR_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "AVSAR_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTunable { name } => {
                write!(f, "{name} does not parse as an engine tunable")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidTunable { .. } => None,
        }
    }
}
