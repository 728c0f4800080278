//! Server configuration from environment variables.
//!
//! Variables are expected to be provided by the runtime environment
//! (container env file, or sourced shell env for local dev).

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("BACKEND_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got {raw:?}"))
            })?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_port_is_a_config_error() {
        std::env::set_var("BACKEND_PORT", "not-a-port");
        let result = ServerConfig::from_env();
        std::env::remove_var("BACKEND_PORT");
        assert!(result.is_err());
    }
}
