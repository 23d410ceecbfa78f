//! Configuration validation
//!
//! Semantic checks that serde cannot express. Runs once at startup,
//! before anything is bound.

use super::types::Config;
use crate::logger::LogLevel;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),
    #[error("server.port must be non-zero")]
    ZeroPort,
    #[error("server.workers must be at least 1")]
    ZeroWorkers,
    #[error("unknown logging.level '{0}' (expected debug, info, warn or error)")]
    UnknownLogLevel(String),
    #[error("http.max_body_size must be greater than zero")]
    ZeroBodyLimit,
    #[error("performance.read_timeout and performance.write_timeout cannot both be zero")]
    ZeroTimeout,
}

/// Collect every problem instead of stopping at the first one
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.get_socket_addr().is_err() {
        errors.push(ValidationError::InvalidAddress(format!(
            "{}:{}",
            config.server.host, config.server.port
        )));
    }
    if config.server.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.server.workers == Some(0) {
        errors.push(ValidationError::ZeroWorkers);
    }
    if config.logging.level.parse::<LogLevel>().is_err() {
        errors.push(ValidationError::UnknownLogLevel(config.logging.level.clone()));
    }
    if config.http.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.performance.read_timeout == 0 && config.performance.write_timeout == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
