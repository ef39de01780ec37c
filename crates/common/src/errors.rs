use domain::{DomainError, WireError};
use thiserror::Error;

/// Основная иерархия ошибок KCloud
#[derive(Error, Debug)]
pub enum DashboardError {
    // === Системные ошибки ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // === Бизнес-логика ===
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    // === Клиент ===
    #[error("Actor not available: {0}")]
    ActorUnavailable(String),

    /// Ошибка, пришедшая от backend'а с неизвестным локально кодом
    #[error("Remote error {code}: {message}")]
    Remote { code: String, message: String },

    // === Общие ===
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Database-specific errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Database locked: {0}")]
    Locked(String),

    #[error("Corruption detected: {0}")]
    Corrupted(String),
}

/// Network-specific errors
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    #[error("HTTP error {code}: {message}")]
    Http { code: u16, message: String },

    #[error("Response exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid format: {field} - expected {expected}")]
    InvalidFormat { field: String, expected: String },

    /// Отказ валидации, пришедший по проводу
    #[error("{0}")]
    Rejected(String),
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(err.to_string())
    }
}

/// Trait для определения retriable ошибок
pub trait IsRetriable {
    fn is_retriable(&self) -> bool;
}

impl IsRetriable for DashboardError {
    fn is_retriable(&self) -> bool {
        match self {
            // Network errors are usually retriable
            DashboardError::Network(NetworkError::InvalidUrl(_)) => false,
            DashboardError::Network(NetworkError::ResponseTooLarge { .. }) => false,
            DashboardError::Network(_) => true,

            // Database locks are retriable
            DashboardError::Database(DatabaseError::Locked(_)) => true,
            DashboardError::Database(DatabaseError::ConnectionFailed(_)) => true,

            DashboardError::Internal(_) => true,
            DashboardError::Remote { code, .. } => {
                matches!(code.as_str(), "INTERNAL_ERROR" | "DB_ERROR" | "NET_ERROR")
            }

            // Отказы доступа и валидации повторять бессмысленно
            _ => false,
        }
    }
}

/// Error severity для alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical - требует немедленного внимания
            DashboardError::Database(DatabaseError::Corrupted(_)) => ErrorSeverity::Critical,
            DashboardError::Internal(_) => ErrorSeverity::Critical,

            // High - важные ошибки
            DashboardError::Database(_) => ErrorSeverity::High,
            DashboardError::Configuration(_) => ErrorSeverity::High,
            DashboardError::Io(_) => ErrorSeverity::High,

            // Medium - operational issues
            DashboardError::Network(_) => ErrorSeverity::Medium,
            DashboardError::Unauthorized(_) => ErrorSeverity::Medium,
            DashboardError::ActorUnavailable(_) => ErrorSeverity::Medium,

            // Low - expected errors
            DashboardError::NotFound(_) => ErrorSeverity::Low,
            DashboardError::Validation(_) => ErrorSeverity::Low,
            DashboardError::Domain(_) => ErrorSeverity::Low,

            _ => ErrorSeverity::Medium,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Io(_) => "IO_ERROR",
            DashboardError::Database(_) => "DB_ERROR",
            DashboardError::Network(_) => "NET_ERROR",
            DashboardError::Serialization(_) => "SERIALIZATION_ERROR",
            DashboardError::Validation(_) => "VALIDATION_ERROR",
            DashboardError::Domain(_) => "BUSINESS_RULE_VIOLATION",
            DashboardError::NotFound(_) => "NOT_FOUND",
            DashboardError::Unauthorized(_) => "UNAUTHORIZED",
            DashboardError::Conflict(_) => "CONFLICT",
            DashboardError::ActorUnavailable(_) => "ACTOR_UNAVAILABLE",
            DashboardError::Remote { .. } => "REMOTE_ERROR",
            DashboardError::Internal(_) => "INTERNAL_ERROR",
            DashboardError::Configuration(_) => "CONFIG_ERROR",
        }
    }

    /// Сообщение для провода без префикса варианта
    pub fn wire_message(&self) -> String {
        match self {
            DashboardError::NotFound(msg)
            | DashboardError::Unauthorized(msg)
            | DashboardError::Conflict(msg)
            | DashboardError::Internal(msg) => msg.clone(),
            DashboardError::Validation(ValidationError::Rejected(msg)) => msg.clone(),
            DashboardError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Ошибка в формате RPC-ответа
    pub fn to_wire(&self) -> WireError {
        let code = match self {
            DashboardError::Remote { code, .. } => code.clone(),
            other => other.error_code().to_string(),
        };
        WireError {
            code,
            message: self.wire_message(),
        }
    }

    /// Восстановить ошибку из RPC-ответа
    pub fn from_wire(err: WireError) -> Self {
        match err.code.as_str() {
            "NOT_FOUND" => DashboardError::NotFound(err.message),
            "UNAUTHORIZED" => DashboardError::Unauthorized(err.message),
            "CONFLICT" => DashboardError::Conflict(err.message),
            "VALIDATION_ERROR" => DashboardError::Validation(ValidationError::Rejected(err.message)),
            "INTERNAL_ERROR" => DashboardError::Internal(err.message),
            _ => DashboardError::Remote {
                code: err.code,
                message: err.message,
            },
        }
    }

    /// Ошибка ввода пользователя (HTTP 400)
    pub fn is_client_error(&self) -> bool {
        match self {
            DashboardError::Validation(_) | DashboardError::Domain(_) => true,
            DashboardError::Remote { code, .. } => {
                matches!(code.as_str(), "VALIDATION_ERROR" | "BUSINESS_RULE_VIOLATION")
            }
            _ => false,
        }
    }
}

/// Result type alias для удобства
pub type DashboardResult<T> = Result<T, DashboardError>;
