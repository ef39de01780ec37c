pub mod errors;
pub mod structured_logging;

pub use errors::{
    DashboardError, DashboardResult, DatabaseError, ErrorSeverity, IsRetriable, NetworkError,
    ValidationError,
};

pub use structured_logging::{
    init_structured_logging, ExecutionContext, JsonFormatter, LoggingConfig, OperationTimer,
    RequestContext, StructuredLogEntry,
};
