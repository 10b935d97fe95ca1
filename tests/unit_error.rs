/// Unit tests for DiError and DiResult types

use ferrous_scope::{DiError, DiResult};
use std::error::Error;

#[test]
fn test_error_display_not_found() {
    let error = DiError::NotFound("TestService");
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Service not found: TestService");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("std::string::String");
    assert_eq!(error.to_string(), "Type mismatch for: std::string::String");
}

#[test]
fn test_error_display_circular() {
    let error = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
    assert_eq!(
        error.to_string(),
        "Circular dependency: ServiceA -> ServiceB -> ServiceA"
    );
}

#[test]
fn test_error_display_lifetime_and_depth() {
    assert_eq!(
        DiError::WrongLifetime("scoped from root").to_string(),
        "Lifetime error: scoped from root"
    );
    assert_eq!(DiError::DepthExceeded(256).to_string(), "Max depth 256 exceeded");
}

#[test]
fn test_error_display_disposal() {
    struct Pool;

    let error = DiError::disposal::<Pool>("connections still checked out");
    assert!(error.is_disposal());
    let display_str = error.to_string();
    assert!(display_str.starts_with("Disposal of "));
    assert!(display_str.contains("Pool"));
    assert!(display_str.ends_with("failed: connections still checked out"));

    assert!(!DiError::NotFound("Pool").is_disposal());
}

#[test]
fn test_error_display_scope_disposed() {
    assert_eq!(DiError::ScopeDisposed.to_string(), "Scope already disposed");
}

#[test]
fn test_error_trait_and_result_alias() {
    let error = DiError::NotFound("Service");
    let as_dyn: &dyn Error = &error;
    assert!(as_dyn.source().is_none());

    let ok: DiResult<u8> = Ok(1);
    let err: DiResult<u8> = Err(error.clone());
    assert_eq!(ok, Ok(1));
    assert_eq!(err.unwrap_err(), error);
}
