//! Tests for error types

use prometheus_task_allocator::core::AllocatorError;

#[test]
fn test_invalid_iri_error() {
    let err = AllocatorError::InvalidIri("tasks/t1".to_string());
    assert_eq!(format!("{}", err), "invalid iri: tasks/t1");
}

#[test]
fn test_invalid_config_error() {
    let err = AllocatorError::InvalidConfig("tasks_per_agent must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid config: tasks_per_agent must be greater than 0"
    );
}

#[test]
fn test_store_error() {
    let err = AllocatorError::Store("connection failed".to_string());
    assert_eq!(format!("{}", err), "store error: connection failed");
}

#[test]
fn test_io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: AllocatorError = io.into();
    assert!(matches!(err, AllocatorError::Io(_)));
    assert_eq!(format!("{}", err), "io error: denied");
}
