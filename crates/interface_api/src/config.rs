//! Gateway configuration

use std::time::Duration;

use serde::Deserialize;

use core_kernel::CadError;
use domain_session::SessionManagerConfig;

/// Where vendor adapters come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterSource {
    /// In-memory auth endpoints and object stores
    #[default]
    Sandbox,
}

/// Gateway configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Upper bound on every vendor auth call
    pub auth_timeout_secs: u64,
    pub adapter_source: AdapterSource,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            auth_timeout_secs: 30,
            adapter_source: AdapterSource::Sandbox,
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from `CAD_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CAD"))
            .build()?
            .try_deserialize()
    }

    /// Rejects settings the gateway cannot run with
    pub fn validate(&self) -> Result<(), CadError> {
        if self.auth_timeout_secs == 0 {
            return Err(CadError::configuration("auth_timeout_secs"));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_manager_config(&self) -> SessionManagerConfig {
        SessionManagerConfig::with_auth_timeout(Duration::from_secs(self.auth_timeout_secs))
    }
}
