use super::*;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Entry {
    color: String,
}

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn test_enforce_key_is_separated_from_entries() {
    let parsed: EnforcedMap<Entry> = EnforcedMap::from_value(
        "labels",
        &yaml("{ enforce: true, bug: { color: red }, docs: { color: blue } }"),
    )
    .unwrap();

    assert!(parsed.enforce);
    let names: Vec<&str> = parsed.entries.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["bug", "docs"]);
}

#[test]
fn test_enforce_defaults_to_false() {
    let parsed: EnforcedMap<Entry> =
        EnforcedMap::from_value("labels", &yaml("{ bug: { color: red } }")).unwrap();

    assert!(!parsed.enforce);
    assert_eq!(parsed.entries["bug"].color, "red");
}

#[test]
fn test_null_section_is_empty() {
    let parsed: EnforcedMap<Entry> = EnforcedMap::from_value("labels", &Value::Null).unwrap();

    assert!(parsed.is_empty());
}

#[test]
fn test_invalid_entry_names_the_entry() {
    let result: ConfigurationResult<EnforcedMap<Entry>> =
        EnforcedMap::from_value("labels", &yaml("{ bug: { colour: red } }"));

    match result {
        Err(ConfigurationError::InvalidConfiguration { field, .. }) => {
            assert_eq!(field, "labels.bug")
        }
        other => panic!("Expected InvalidConfiguration, got {:?}", other),
    }
}

#[test]
fn test_non_boolean_enforce_is_rejected() {
    let result: ConfigurationResult<EnforcedMap<Entry>> =
        EnforcedMap::from_value("labels", &yaml("{ enforce: sometimes }"));

    assert!(result.is_err());
}
