// Configuration module entry point
// Loads layered configuration (defaults, config file, environment) and
// holds the shared application state.

mod state;
mod types;
mod validation;

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::ConfigBuilder;

// Re-export public types
pub use state::AppState;
pub use types::Config;
pub use validation::ValidationError;

/// Prefix for environment overrides, e.g. `PEAKCART_SERVER__PORT=9090`
const ENV_PREFIX: &str = "PEAKCART";

impl Config {
    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_grace_period", 10)?
            .set_default("http.max_body_size", 65_536) // 64KB
    }

    /// Load configuration from specified file path (extension optional).
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::builder_with_defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Built-in defaults only, ignoring files and environment
    #[cfg(test)]
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::builder_with_defaults()?.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validation::validate(self)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Upper bound on the lifetime of a single connection
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(std::cmp::max(
            self.performance.read_timeout,
            self.performance.write_timeout,
        ))
    }

    pub const fn shutdown_grace_period(&self) -> Duration {
        Duration::from_secs(self.performance.shutdown_grace_period)
    }
}
