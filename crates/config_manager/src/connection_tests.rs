use super::*;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use tracing_test::traced_test;

fn connection(yaml: &str) -> GitLabConnection {
    serde_yaml::from_str(yaml).unwrap()
}

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_defaults_for_optional_fields() {
    let connection = connection("url: https://gitlab.example.com\ntoken: abc");

    let settings = connection.client_settings_with(env(&[])).unwrap();

    assert_eq!(settings.url, "https://gitlab.example.com");
    assert_eq!(settings.token.expose_secret(), "abc");
    assert!(settings.ssl_verify);
    assert_eq!(settings.timeout, Duration::from_secs(10));
}

#[test]
#[traced_test]
fn test_environment_overrides_file_values() {
    let connection = connection("url: https://file.example.com\ntoken: from-file\nssl_verify: false");

    let settings = connection
        .client_settings_with(env(&[
            (GITLAB_URL_ENV, "https://env.example.com"),
            (GITLAB_TOKEN_ENV, "from-env"),
        ]))
        .unwrap();

    assert_eq!(settings.url, "https://env.example.com");
    assert_eq!(settings.token.expose_secret(), "from-env");
    assert!(!settings.ssl_verify);
    assert!(logs_contain("GitLab URL taken from the environment"));
}

#[test]
fn test_token_from_environment_only() {
    let connection = connection("url: https://gitlab.example.com");

    let settings = connection
        .client_settings_with(env(&[(GITLAB_TOKEN_ENV, "secret")]))
        .unwrap();

    assert_eq!(settings.token.expose_secret(), "secret");
}

#[test]
fn test_missing_token_is_reported() {
    let connection = GitLabConnection {
        url: Some("https://gitlab.example.com".to_string()),
        ..Default::default()
    };

    let result = connection.client_settings_with(env(&[]));

    assert_eq!(
        result.unwrap_err(),
        ConfigurationError::RequiredConfigMissing {
            key: "gitlab.token".to_string()
        }
    );
}

#[test]
fn test_zero_timeout_is_rejected() {
    let connection = connection("url: https://gitlab.example.com\ntoken: abc\ntimeout: 0");

    let result = connection.client_settings_with(env(&[]));

    assert!(matches!(
        result,
        Err(ConfigurationError::InvalidConfiguration { .. })
    ));
}
