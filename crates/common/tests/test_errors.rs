use common::{DashboardError, DatabaseError, ErrorSeverity, IsRetriable, NetworkError};
use domain::{DomainError, WireError};

#[test]
fn test_payment_rule_maps_to_client_error() {
    let err: DashboardError = DomainError::PaymentExceedsBalance {
        amount: 50.0,
        remaining: 10.0,
    }
    .into();

    assert!(err.is_client_error());
    assert!(!err.is_retriable());
    assert_eq!(err.severity(), ErrorSeverity::Low);

    let wire = err.to_wire();
    assert_eq!(wire.code, "BUSINESS_RULE_VIOLATION");
    assert_eq!(
        wire.message,
        "Payment amount 50.00 exceeds remaining balance 10.00"
    );
}

#[test]
fn test_not_found_message_has_no_prefix_on_wire() {
    let err = DashboardError::NotFound("Bill 3".to_string());
    assert_eq!(err.to_string(), "Resource not found: Bill 3");
    assert_eq!(err.to_wire().message, "Bill 3");
}

#[test]
fn test_from_wire_known_codes() {
    let err = DashboardError::from_wire(WireError {
        code: "UNAUTHORIZED".to_string(),
        message: "Only users can view bills".to_string(),
    });
    assert!(matches!(err, DashboardError::Unauthorized(_)));
    assert_eq!(err.severity(), ErrorSeverity::Medium);
}

#[test]
fn test_infrastructure_errors_are_retriable() {
    assert!(DashboardError::Database(DatabaseError::Locked("busy".into())).is_retriable());
    assert!(DashboardError::Network(NetworkError::ConnectionRefused("x".into())).is_retriable());
    assert!(!DashboardError::Network(NetworkError::InvalidUrl("::".into())).is_retriable());
    assert!(!DashboardError::ActorUnavailable("no session".into()).is_retriable());
}

#[test]
fn test_serde_error_conversion() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
    let err: DashboardError = parse.unwrap_err().into();
    assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
}
