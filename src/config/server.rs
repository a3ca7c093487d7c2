use std::str::FromStr;

use crate::core::{AppError, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Seconds in-flight checkouts get to finish on shutdown
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Defaults to one worker per CPU
    pub workers: usize,

    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            workers: num_cpus::get(),
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }

    /// Reads `SERVER_HOST`, `SERVER_PORT`, `SERVER_WORKERS` and
    /// `SERVER_SHUTDOWN_TIMEOUT`
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = var("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&var, "SERVER_PORT")?.unwrap_or(DEFAULT_PORT);

        let mut config = Self::new(host, port);
        if let Some(workers) = parse_var(&var, "SERVER_WORKERS")? {
            config.workers = workers;
        }
        if let Some(timeout) = parse_var(&var, "SERVER_SHUTDOWN_TIMEOUT")? {
            config.shutdown_timeout_secs = timeout;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(AppError::Configuration(
                "SERVER_WORKERS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(var: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    var(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| AppError::Configuration(format!("Invalid {}: {}", key, raw)))
        })
        .transpose()
}
