use super::*;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct Wrapper {
    #[serde(deserialize_with = "scalar_string")]
    value: String,
}

#[test]
fn test_scalar_string_accepts_numbers_and_booleans() {
    let number: Wrapper = serde_yaml::from_str("value: 42").unwrap();
    let flag: Wrapper = serde_yaml::from_str("value: false").unwrap();
    let text: Wrapper = serde_yaml::from_str("value: \"007\"").unwrap();

    assert_eq!(number.value, "42");
    assert_eq!(flag.value, "false");
    assert_eq!(text.value, "007");
}

#[test]
fn test_scalar_string_rejects_sequences() {
    let result: Result<Wrapper, _> = serde_yaml::from_str("value: [1, 2]");

    assert!(result.is_err());
}

#[test]
fn test_parse_section_names_section_in_errors() {
    let value: Value = serde_yaml::from_str("users: 5").unwrap();

    let result: ConfigurationResult<MembersConfig> = parse_section("group_members", &value);

    match result {
        Err(ConfigurationError::InvalidConfiguration { field, .. }) => {
            assert_eq!(field, "group_members")
        }
        other => panic!("Expected InvalidConfiguration, got {:?}", other),
    }
}

#[test]
fn test_to_json_converts_nested_yaml() {
    let value: Value =
        serde_yaml::from_str("visibility: private\nci_config: { depth: 20 }").unwrap();

    assert_eq!(
        to_json("project_settings", &value).unwrap(),
        json!({ "visibility": "private", "ci_config": { "depth": 20 } })
    );
}
