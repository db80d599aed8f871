//! Tests for configuration error types.

use super::*;

#[test]
fn configuration_error_invalid_configuration_names_field() {
    let error = ConfigurationError::invalid("members.users.jane", "unknown access level");

    assert_eq!(
        error.to_string(),
        "Invalid configuration: members.users.jane - unknown access level"
    );
}

#[test]
fn configuration_error_unsupported_version() {
    let error = ConfigurationError::UnsupportedVersion {
        version: "2".to_string(),
    };

    assert!(error.to_string().contains("config_version 2"));
}

#[test]
fn configuration_error_required_config_missing() {
    let error = ConfigurationError::RequiredConfigMissing {
        key: "projects_and_groups".to_string(),
    };

    match error {
        ConfigurationError::RequiredConfigMissing { key } => {
            assert_eq!(key, "projects_and_groups")
        }
        _ => panic!("Expected RequiredConfigMissing"),
    }
}
