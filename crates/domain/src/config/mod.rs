use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration profile for different environments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Development profile with verbose logging
    #[default]
    Dev,
    /// Production profile with JSON logging
    Prod,
    /// Custom profile with user-defined name
    Custom(String),
}

impl Profile {
    /// Get the profile name as a string
    pub fn name(&self) -> &str {
        match self {
            Profile::Dev => "dev",
            Profile::Prod => "prod",
            Profile::Custom(name) => name,
        }
    }
}

impl FromStr for Profile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "dev" | "development" => Profile::Dev,
            "prod" | "production" => Profile::Prod,
            custom => Profile::Custom(custom.to_string()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    /// Active configuration profile
    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub outcall: OutcallConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Apply built-in profile defaults (prod switches to JSON logs)
    pub fn apply_profile(&mut self) {
        if self.profile == Profile::Prod {
            self.logging.json = true;
            if self.logging.level == default_log_level() {
                self.logging.level = "warn".to_string();
            }
        }
    }
}

/// HTTP RPC server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// SQLite storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Capacity of the per-owner summary cache
    #[serde(default = "default_summary_cache_size")]
    pub summary_cache_size: usize,
}

/// Client-side settings: endpoint, query cache and session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// How long a fetched query stays fresh
    #[serde(default = "default_stale_time_secs")]
    pub stale_time_secs: u64,

    /// Retries for failing queries (profile query never retries)
    #[serde(default = "default_query_retries")]
    pub query_retries: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Session file path, falling back to the user data directory
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(".kcloud").join("session.json"))
    }
}

/// HTTP outcall settings for live NNS data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcallConfig {
    #[serde(default = "default_outcall_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON structured output instead of human readable
    #[serde(default)]
    pub json: bool,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            pool_size: default_pool_size(),
            summary_cache_size: default_summary_cache_size(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            stale_time_secs: default_stale_time_secs(),
            query_retries: default_query_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            cache_capacity: default_cache_capacity(),
            request_timeout_secs: default_request_timeout_secs(),
            session_file: None,
        }
    }
}

impl Default for OutcallConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_outcall_timeout_secs(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4943
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/kcloud.db")
}

fn default_pool_size() -> u32 {
    4
}

fn default_summary_cache_size() -> usize {
    256
}

fn default_endpoint() -> String {
    "http://127.0.0.1:4943".to_string()
}

fn default_stale_time_secs() -> u64 {
    0
}

fn default_query_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_cache_capacity() -> usize {
    128
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_outcall_timeout_secs() -> u64 {
    10
}

fn default_max_response_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_user_agent() -> String {
    format!("kcloud/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.server.port, 4943);
        assert_eq!(config.storage.pool_size, 4);
        assert_eq!(config.client.query_retries, 3);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_prod_profile_switches_to_json() {
        let mut config = DashboardConfig {
            profile: Profile::Prod,
            ..Default::default()
        };
        config.apply_profile();
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("production".parse::<Profile>().unwrap(), Profile::Prod);
        assert_eq!(
            "staging".parse::<Profile>().unwrap(),
            Profile::Custom("staging".to_string())
        );
    }
}
