use super::*;
use crate::mock_gitlab::{context, group_target, project_key, project_target, yaml, MockGitLab};
use serde_json::json;
use std::sync::Arc;

const PROJECT: &str = "platform/api";

fn setup() -> Arc<MockGitLab> {
    let api = Arc::new(MockGitLab::new());
    api.add_group(1, "platform");
    api.add_project(10, PROJECT, false);
    api
}

#[test]
fn test_changed_settings_keeps_only_differences() {
    let current = json!({ "visibility": "private", "description": "API", "topics": ["a"] });
    let desired = match json!({ "visibility": "internal", "description": "API", "topics": ["a", "b"] }) {
        JsonValue::Object(map) => map,
        _ => unreachable!(),
    };

    let changed = changed_settings(&current, &desired);

    let keys: Vec<&String> = changed.keys().collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(changed["visibility"], json!("internal"));
    assert_eq!(changed["topics"], json!(["a", "b"]));
}

#[tokio::test]
async fn test_sends_only_changed_keys_in_one_update() {
    let api = setup();
    api.state().settings.insert(
        project_key(PROJECT),
        match json!({ "visibility": "private", "description": "API" }) {
            JsonValue::Object(map) => map,
            _ => unreachable!(),
        },
    );
    let ctx = context(&api, false);
    let target = project_target(&api, PROJECT).await;
    let section = yaml(
        r#"
visibility: internal
description: API
merge_method: ff
"#,
    );
    let processor = SettingsProcessor::new(EntityKind::Project);

    let result = processor.process(&ctx, &target, &section).await.unwrap();
    assert_eq!(result.updated, 1);
    assert_eq!(
        api.calls(),
        vec![r#"update_settings project 'platform/api' ["merge_method", "visibility"]"#.to_string()]
    );

    api.clear_calls();
    let again = processor.process(&ctx, &target, &section).await.unwrap();
    assert_eq!(again.skipped, 1);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_non_mapping_section_is_invalid_input() {
    let api = setup();
    let ctx = context(&api, false);
    let target = group_target(&api, "platform").await;

    let err = SettingsProcessor::new(EntityKind::Group)
        .process(&ctx, &target, &yaml("- visibility"))
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(api.calls().is_empty());
}
