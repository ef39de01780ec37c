use anyhow::{bail, Result};
use domain::config::*;
use tracing::warn;

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, config: &DashboardConfig) -> Result<()> {
        self.validate_server_config(&config.server)?;
        self.validate_storage_config(&config.storage)?;
        self.validate_client_config(&config.client)?;
        self.validate_outcall_config(&config.outcall)?;
        self.validate_logging_config(&config.logging)?;
        Ok(())
    }

    fn validate_server_config(&self, config: &ServerConfig) -> Result<()> {
        if config.host.trim().is_empty() {
            bail!("Server host cannot be empty");
        }
        if config.port == 0 {
            bail!("Server port must be greater than 0");
        }
        Ok(())
    }

    fn validate_storage_config(&self, config: &StorageConfig) -> Result<()> {
        if config.pool_size == 0 {
            bail!("Storage pool_size must be greater than 0");
        }
        if config.summary_cache_size == 0 {
            bail!("Storage summary_cache_size must be greater than 0");
        }
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                warn!(
                    "Database directory does not exist yet and will be created: {}",
                    parent.display()
                );
            }
        }
        Ok(())
    }

    fn validate_client_config(&self, config: &ClientConfig) -> Result<()> {
        if !(config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://")) {
            bail!(
                "Client endpoint must be an http(s) URL, got '{}'",
                config.endpoint
            );
        }
        if config.cache_capacity == 0 {
            bail!("Client cache_capacity must be greater than 0");
        }
        if config.request_timeout_secs == 0 {
            bail!("Client request_timeout_secs must be greater than 0");
        }
        if config.query_retries > 10 {
            warn!(
                "query_retries = {} will make failing queries very slow",
                config.query_retries
            );
        }
        Ok(())
    }

    fn validate_outcall_config(&self, config: &OutcallConfig) -> Result<()> {
        if config.timeout_secs == 0 {
            bail!("Outcall timeout_secs must be greater than 0");
        }
        if config.max_response_bytes == 0 {
            bail!("Outcall max_response_bytes must be greater than 0");
        }
        Ok(())
    }

    fn validate_logging_config(&self, config: &LoggingConfig) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&config.level.to_lowercase().as_str()) {
            bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                config.level,
                VALID_LOG_LEVELS
            );
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
