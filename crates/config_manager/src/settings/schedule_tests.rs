use super::*;
use crate::settings::EnforcedMap;

fn schedules(yaml: &str) -> EnforcedMap<ScheduleConfig> {
    EnforcedMap::from_value("schedules", &serde_yaml::from_str(yaml).unwrap()).unwrap()
}

#[test]
fn test_defaults_are_filled_in() {
    let parsed = schedules(
        r#"
Nightly:
  ref: main
  cron: "0 1 * * *"
"#,
    );

    let desired = parsed.entries["Nightly"]
        .desired("schedules", "Nightly")
        .unwrap();

    assert_eq!(desired.cron_timezone, "UTC");
    assert!(desired.active);
    assert!(desired.variables.is_empty());
}

#[test]
fn test_explicit_values_are_kept() {
    let parsed = schedules(
        r#"
Weekly:
  ref: release
  cron: "0 3 * * 1"
  cron_timezone: Europe/Berlin
  active: false
  variables:
    RETRIES: { value: 3 }
    CONFIG: { value: "a=b", variable_type: file }
"#,
    );

    let desired = parsed.entries["Weekly"]
        .desired("schedules", "Weekly")
        .unwrap();

    assert_eq!(desired.cron_timezone, "Europe/Berlin");
    assert!(!desired.active);
    assert_eq!(
        desired.variables,
        vec![
            PipelineScheduleVariable {
                key: "RETRIES".to_string(),
                value: "3".to_string(),
                variable_type: "env_var".to_string(),
            },
            PipelineScheduleVariable {
                key: "CONFIG".to_string(),
                value: "a=b".to_string(),
                variable_type: "file".to_string(),
            },
        ]
    );
}

#[test]
fn test_delete_marker_needs_no_other_fields() {
    let parsed = schedules("Old: { delete: true }");

    assert!(parsed.entries["Old"].delete);
}

#[test]
fn test_missing_cron_is_reported() {
    let parsed = schedules("Nightly: { ref: main }");

    let error = parsed.entries["Nightly"]
        .desired("schedules", "Nightly")
        .unwrap_err();

    match error {
        ConfigurationError::InvalidConfiguration { field, .. } => {
            assert_eq!(field, "schedules.Nightly.cron")
        }
        other => panic!("Expected InvalidConfiguration, got {:?}", other),
    }
}
