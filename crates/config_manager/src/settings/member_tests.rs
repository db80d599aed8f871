use super::*;
use crate::settings::parse_section;

#[test]
fn test_members_section_parses_users_and_groups() {
    let value = serde_yaml::from_str(
        r#"
enforce: true
keep_bots: true
users:
  Jane.Doe:
    access_level: maintainer
    expires_at: 2030-12-31
    member_role: Security auditor
  john:
    access_level: 30
    member_role: 12
groups:
  platform/security:
    group_access: reporter
"#,
    )
    .unwrap();

    let members: MembersConfig = parse_section("members", &value).unwrap();

    assert!(members.enforce);
    assert!(members.keep_bots);
    let jane = &members.users["Jane.Doe"];
    assert_eq!(jane.access_level, AccessLevel::MAINTAINER);
    assert_eq!(jane.expires_at, NaiveDate::from_ymd_opt(2030, 12, 31));
    assert_eq!(
        jane.member_role,
        Some(MemberRoleSpec::Name("Security auditor".to_string()))
    );
    assert_eq!(members.users["john"].member_role, Some(MemberRoleSpec::Id(12)));
    assert_eq!(
        members.groups["platform/security"].group_access,
        AccessLevel::REPORTER
    );
}

#[test]
fn test_group_share_accepts_access_level_alias() {
    let value = serde_yaml::from_str("groups: { ops: { access_level: developer } }").unwrap();

    let members: MembersConfig = parse_section("members", &value).unwrap();

    assert_eq!(members.groups["ops"].group_access, AccessLevel::DEVELOPER);
}

#[test]
fn test_empty_section_without_enforce_is_noop() {
    let value = serde_yaml::from_str("keep_bots: true").unwrap();

    let members: MembersConfig = parse_section("members", &value).unwrap();

    assert!(members.is_noop());
}

#[test]
fn test_enforce_alone_is_not_noop() {
    let members = MembersConfig {
        enforce: true,
        ..Default::default()
    };

    assert!(!members.is_noop());
}

#[test]
fn test_invalid_access_level_is_rejected() {
    let value = serde_yaml::from_str("users: { jane: { access_level: superuser } }").unwrap();

    let result: crate::ConfigurationResult<MembersConfig> = parse_section("members", &value);

    assert!(result.is_err());
}

#[test]
fn test_admin_access_level_is_rejected() {
    for level in ["admin", "60"] {
        let value =
            serde_yaml::from_str(&format!("users: {{ jane: {{ access_level: {} }} }}", level))
                .unwrap();

        let result: crate::ConfigurationResult<MembersConfig> = parse_section("members", &value);

        assert!(result.is_err(), "access level {} was accepted", level);
    }
}
