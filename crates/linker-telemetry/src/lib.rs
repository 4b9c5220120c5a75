//! Tracing subscriber setup shared by the linker binaries.
//!
//! Each deployment environment picks an output format and a default level.
//! `RUST_LOG` overrides the level when it is set.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("unknown environment {0:?}, expected one of local, dev, prod, test")]
    UnknownEnvironment(String),
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Dev,
    Prod,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Environment {
    pub fn default_level(self) -> Level {
        match self {
            Environment::Local => Level::DEBUG,
            Environment::Dev => Level::INFO,
            Environment::Prod => Level::WARN,
            Environment::Test => Level::ERROR,
        }
    }

    pub fn log_format(self) -> LogFormat {
        match self {
            Environment::Local => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
            Environment::Test => write!(f, "test"),
        }
    }
}

impl FromStr for Environment {
    type Err = TelemetryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            "test" => Ok(Environment::Test),
            other => Err(TelemetryError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Installs the global subscriber for `environment`.
///
/// Fails if a global subscriber is already installed.
pub fn init(environment: Environment) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.default_level().as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match environment.log_format() {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| TelemetryError::Init(err.to_string()))
}
