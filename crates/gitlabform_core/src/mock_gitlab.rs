//! In-memory GitLab used by the processor and orchestration tests.
//!
//! The mock keeps the state a real instance would hold so that reconciliation can be
//! applied repeatedly and convergence asserted. Every mutating call is recorded in
//! `calls`; calls whose description starts with an entry of `failing` return a 500.

use async_trait::async_trait;
use gitlab_client::{
    AccessLevel, AddMemberPayload, Badge, BadgePayload, EntityKind, Error, GitLabApi,
    GitLabResult, Group, Hook, Label, LabelPayload, Member, MemberRole, MemberRoleRef,
    Namespace, PipelineSchedule, PipelineSchedulePayload, PipelineScheduleVariable, Project,
    SamlGroupLink, SamlGroupLinkPayload, Scope, ShareWithGroupPayload, SharedGroup,
    UpdateMemberPayload, User, Variable,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{ProcessorContext, Target};

pub(crate) const TOKEN_OWNER: &str = "gitlabform";

#[derive(Debug, Default)]
pub(crate) struct MockState {
    pub projects: Vec<Project>,
    pub groups: Vec<Group>,
    pub users: Vec<User>,
    pub member_roles: Vec<MemberRole>,
    pub settings: HashMap<String, Map<String, Value>>,
    pub members: HashMap<String, Vec<Member>>,
    pub saml_links: HashMap<String, Vec<SamlGroupLink>>,
    pub schedules: HashMap<String, Vec<PipelineSchedule>>,
    pub labels: HashMap<String, Vec<Label>>,
    pub variables: HashMap<String, Vec<Variable>>,
    pub badges: HashMap<String, Vec<Badge>>,
    pub hooks: HashMap<String, Vec<Hook>>,
    pub calls: Vec<String>,
    pub failing: Vec<String>,
    next_id: u64,
}

impl MockState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        1000 + self.next_id
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockGitLab {
    state: Mutex<MockState>,
    saas: bool,
}

pub(crate) fn key(scope: &Scope) -> String {
    format!("{}:{}", scope.kind(), scope.path().to_lowercase())
}

pub(crate) fn project_key(path: &str) -> String {
    key(&Scope::project(path))
}

pub(crate) fn group_key(path: &str) -> String {
    key(&Scope::group(path))
}

fn server_error() -> Error {
    Error::Api {
        status: 500,
        message: "injected failure".to_string(),
    }
}

impl MockGitLab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saas() -> Self {
        Self {
            saas: true,
            ..Self::default()
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn fail_calls_starting_with(&self, prefix: &str) {
        self.state().failing.push(prefix.to_string());
    }

    pub fn add_user(&self, id: u64, username: &str, bot: bool) {
        self.state().users.push(User {
            id,
            username: username.to_string(),
            bot,
        });
    }

    pub fn add_group(&self, id: u64, full_path: &str) {
        let parent_id = full_path.rsplit_once('/').and_then(|(parent, _)| {
            self.state()
                .groups
                .iter()
                .find(|g| g.full_path.eq_ignore_ascii_case(parent))
                .map(|g| g.id)
        });
        self.state().groups.push(Group {
            id,
            full_path: full_path.to_string(),
            parent_id,
            shared_with_groups: Vec::new(),
        });
    }

    pub fn add_project(&self, id: u64, path: &str, archived: bool) {
        let namespace = path.rsplit_once('/').map(|(ns, _)| ns).unwrap_or("");
        self.state().projects.push(Project {
            id,
            path_with_namespace: path.to_string(),
            archived,
            namespace: Namespace {
                id: 0,
                full_path: namespace.to_string(),
                kind: "group".to_string(),
                parent_id: None,
            },
            shared_with_groups: Vec::new(),
        });
    }

    pub fn seed_member(&self, scope: &Scope, user_id: u64, access_level: AccessLevel) {
        let mut state = self.state();
        let username = state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default();
        state.members.entry(key(scope)).or_default().push(Member {
            id: user_id,
            username,
            access_level,
            expires_at: None,
            member_role: None,
        });
    }

    pub fn seed_member_role(&self, scope: &Scope, user_id: u64, role_id: u64) {
        let mut state = self.state();
        if let Some(member) = state
            .members
            .get_mut(&key(scope))
            .and_then(|members| members.iter_mut().find(|m| m.id == user_id))
        {
            member.member_role = Some(MemberRoleRef { id: role_id });
        }
    }

    pub fn members(&self, scope: &Scope) -> Vec<Member> {
        self.state().members.get(&key(scope)).cloned().unwrap_or_default()
    }

    pub fn add_schedule(&self, project: &str, schedule: PipelineSchedule) {
        self.state()
            .schedules
            .entry(project_key(project))
            .or_default()
            .push(schedule);
    }

    pub fn schedules(&self, project: &str) -> Vec<PipelineSchedule> {
        self.state()
            .schedules
            .get(&project_key(project))
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: String) -> GitLabResult<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        let fails = state.failing.iter().any(|prefix| call.starts_with(prefix));
        state.calls.push(call);
        if fails {
            return Err(server_error());
        }
        Ok(state)
    }

    fn shares_mut<'a>(
        state: &'a mut MockState,
        scope: &Scope,
    ) -> GitLabResult<&'a mut Vec<SharedGroup>> {
        let path = scope.path();
        match scope.kind() {
            EntityKind::Project => state
                .projects
                .iter_mut()
                .find(|p| p.path_with_namespace.eq_ignore_ascii_case(path))
                .map(|p| &mut p.shared_with_groups),
            EntityKind::Group => state
                .groups
                .iter_mut()
                .find(|g| g.full_path.eq_ignore_ascii_case(path))
                .map(|g| &mut g.shared_with_groups),
        }
        .ok_or(Error::NotFound)
    }
}

/// A processor context backed by `api`.
pub(crate) fn context(api: &Arc<MockGitLab>, dry_run: bool) -> ProcessorContext {
    let api: Arc<dyn GitLabApi> = api.clone();
    ProcessorContext::new(api, dry_run)
}

/// Fetches a project the way the orchestrator does before processing it.
pub(crate) async fn project_target(api: &MockGitLab, path: &str) -> Target {
    Target::Project(api.get_project(path).await.expect("project exists in mock"))
}

pub(crate) async fn group_target(api: &MockGitLab, path: &str) -> Target {
    Target::Group(api.get_group(path).await.expect("group exists in mock"))
}

pub(crate) fn yaml(text: &str) -> serde_yaml::Value {
    serde_yaml::from_str(text).expect("valid YAML in test")
}

fn is_below(path: &str, group: &str) -> bool {
    path.to_lowercase()
        .starts_with(&format!("{}/", group.to_lowercase()))
}

#[async_trait]
impl GitLabApi for MockGitLab {
    async fn get_project(&self, path: &str) -> GitLabResult<Project> {
        self.state()
            .projects
            .iter()
            .find(|p| p.path_with_namespace.eq_ignore_ascii_case(path))
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn get_group(&self, path: &str) -> GitLabResult<Group> {
        self.state()
            .groups
            .iter()
            .find(|g| g.full_path.eq_ignore_ascii_case(path))
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn list_projects(&self) -> GitLabResult<Vec<Project>> {
        Ok(self.state().projects.clone())
    }

    async fn list_groups(&self) -> GitLabResult<Vec<Group>> {
        Ok(self.state().groups.clone())
    }

    async fn list_group_projects(&self, group: &str) -> GitLabResult<Vec<Project>> {
        self.get_group(group).await?;
        Ok(self
            .state()
            .projects
            .iter()
            .filter(|p| is_below(&p.path_with_namespace, group))
            .cloned()
            .collect())
    }

    async fn list_descendant_groups(&self, group: &str) -> GitLabResult<Vec<Group>> {
        self.get_group(group).await?;
        Ok(self
            .state()
            .groups
            .iter()
            .filter(|g| is_below(&g.full_path, group))
            .cloned()
            .collect())
    }

    async fn get_settings(&self, scope: &Scope) -> GitLabResult<Value> {
        let settings = self.state().settings.get(&key(scope)).cloned();
        Ok(Value::Object(settings.unwrap_or_default()))
    }

    async fn update_settings(
        &self,
        scope: &Scope,
        settings: &Map<String, Value>,
    ) -> GitLabResult<()> {
        let mut keys: Vec<&String> = settings.keys().collect();
        keys.sort();
        let mut state = self.record(format!("update_settings {} {:?}", scope, keys))?;
        let current = state.settings.entry(key(scope)).or_default();
        for (name, value) in settings {
            current.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> GitLabResult<Option<User>> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn list_member_roles(&self, group_id: Option<u64>) -> GitLabResult<Vec<MemberRole>> {
        Ok(self
            .state()
            .member_roles
            .iter()
            .filter(|role| role.group_id == group_id)
            .cloned()
            .collect())
    }

    fn is_saas(&self) -> bool {
        self.saas
    }

    async fn list_members(&self, scope: &Scope) -> GitLabResult<Vec<Member>> {
        Ok(self.members(scope))
    }

    async fn add_member(&self, scope: &Scope, member: &AddMemberPayload) -> GitLabResult<()> {
        let mut state = self.record(format!("add_member {} {}", scope, member.user_id))?;
        let username = state
            .users
            .iter()
            .find(|u| u.id == member.user_id)
            .map(|u| u.username.clone())
            .ok_or(Error::NotFound)?;
        state.members.entry(key(scope)).or_default().push(Member {
            id: member.user_id,
            username,
            access_level: member.access_level,
            expires_at: member.expires_at,
            member_role: member.member_role_id.map(|id| MemberRoleRef { id }),
        });
        Ok(())
    }

    async fn update_member(
        &self,
        scope: &Scope,
        user_id: u64,
        member: &UpdateMemberPayload,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!("update_member {} {}", scope, user_id))?;
        let existing = state
            .members
            .get_mut(&key(scope))
            .and_then(|members| members.iter_mut().find(|m| m.id == user_id))
            .ok_or(Error::NotFound)?;
        // Apply only the attributes present on the wire, as GitLab does.
        let wire = serde_json::to_value(member).map_err(Error::Deserialization)?;
        existing.access_level = member.access_level;
        if wire.get("expires_at").is_some() {
            existing.expires_at = member.expires_at;
        }
        if wire.get("member_role_id").is_some() {
            existing.member_role = member.member_role_id.map(|id| MemberRoleRef { id });
        }
        Ok(())
    }

    async fn remove_member(&self, scope: &Scope, user_id: u64) -> GitLabResult<()> {
        let mut state = self.record(format!("remove_member {} {}", scope, user_id))?;
        if let Some(members) = state.members.get_mut(&key(scope)) {
            members.retain(|m| m.id != user_id);
        }
        Ok(())
    }

    async fn share_with_group(
        &self,
        scope: &Scope,
        share: &ShareWithGroupPayload,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!("share_with_group {} {}", scope, share.group_id))?;
        let group_path = state
            .groups
            .iter()
            .find(|g| g.id == share.group_id)
            .map(|g| g.full_path.clone())
            .ok_or(Error::NotFound)?;
        let shares = Self::shares_mut(&mut state, scope)?;
        shares.push(SharedGroup {
            group_id: share.group_id,
            group_name: group_path.rsplit('/').next().unwrap_or_default().to_string(),
            group_full_path: group_path,
            group_access_level: share.group_access,
            expires_at: share.expires_at,
        });
        Ok(())
    }

    async fn unshare_with_group(&self, scope: &Scope, group_id: u64) -> GitLabResult<()> {
        let mut state = self.record(format!("unshare_with_group {} {}", scope, group_id))?;
        let shares = Self::shares_mut(&mut state, scope)?;
        shares.retain(|s| s.group_id != group_id);
        Ok(())
    }

    async fn list_saml_links(&self, group: &str) -> GitLabResult<Vec<SamlGroupLink>> {
        Ok(self
            .state()
            .saml_links
            .get(&group_key(group))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_saml_link(
        &self,
        group: &str,
        link: &SamlGroupLinkPayload,
    ) -> GitLabResult<()> {
        let mut state =
            self.record(format!("create_saml_link {} {}", group, link.saml_group_name))?;
        state
            .saml_links
            .entry(group_key(group))
            .or_default()
            .push(SamlGroupLink {
                name: link.saml_group_name.clone(),
                access_level: link.access_level,
                member_role_id: link.member_role_id,
                provider: link.provider.clone(),
            });
        Ok(())
    }

    async fn delete_saml_link(&self, group: &str, saml_group_name: &str) -> GitLabResult<()> {
        let mut state = self.record(format!("delete_saml_link {} {}", group, saml_group_name))?;
        if let Some(links) = state.saml_links.get_mut(&group_key(group)) {
            links.retain(|l| l.name != saml_group_name);
        }
        Ok(())
    }

    async fn list_pipeline_schedules(
        &self,
        project: &str,
    ) -> GitLabResult<Vec<PipelineSchedule>> {
        Ok(self
            .schedules(project)
            .into_iter()
            .map(|schedule| PipelineSchedule {
                variables: Vec::new(),
                ..schedule
            })
            .collect())
    }

    async fn get_pipeline_schedule(
        &self,
        project: &str,
        schedule_id: u64,
    ) -> GitLabResult<PipelineSchedule> {
        self.schedules(project)
            .into_iter()
            .find(|s| s.id == schedule_id)
            .ok_or(Error::NotFound)
    }

    async fn create_pipeline_schedule(
        &self,
        project: &str,
        schedule: &PipelineSchedulePayload,
    ) -> GitLabResult<PipelineSchedule> {
        let description = schedule.description.clone().unwrap_or_default();
        let mut state =
            self.record(format!("create_pipeline_schedule {} {}", project, description))?;
        let id = state.next_id();
        let created = PipelineSchedule {
            id,
            description,
            git_ref: schedule.git_ref.clone().unwrap_or_default(),
            cron: schedule.cron.clone().unwrap_or_default(),
            cron_timezone: schedule
                .cron_timezone
                .clone()
                .unwrap_or_else(|| "UTC".to_string()),
            active: schedule.active.unwrap_or(true),
            owner: Some(User {
                id: 1,
                username: TOKEN_OWNER.to_string(),
                bot: false,
            }),
            variables: Vec::new(),
        };
        state
            .schedules
            .entry(project_key(project))
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update_pipeline_schedule(
        &self,
        project: &str,
        schedule_id: u64,
        schedule: &PipelineSchedulePayload,
    ) -> GitLabResult<()> {
        let mut state =
            self.record(format!("update_pipeline_schedule {} {}", project, schedule_id))?;
        let existing = state
            .schedules
            .get_mut(&project_key(project))
            .and_then(|all| all.iter_mut().find(|s| s.id == schedule_id))
            .ok_or(Error::NotFound)?;
        if let Some(description) = &schedule.description {
            existing.description = description.clone();
        }
        if let Some(git_ref) = &schedule.git_ref {
            existing.git_ref = git_ref.clone();
        }
        if let Some(cron) = &schedule.cron {
            existing.cron = cron.clone();
        }
        if let Some(timezone) = &schedule.cron_timezone {
            existing.cron_timezone = timezone.clone();
        }
        if let Some(active) = schedule.active {
            existing.active = active;
        }
        Ok(())
    }

    async fn delete_pipeline_schedule(
        &self,
        project: &str,
        schedule_id: u64,
    ) -> GitLabResult<()> {
        let mut state =
            self.record(format!("delete_pipeline_schedule {} {}", project, schedule_id))?;
        if let Some(all) = state.schedules.get_mut(&project_key(project)) {
            all.retain(|s| s.id != schedule_id);
        }
        Ok(())
    }

    async fn take_pipeline_schedule_ownership(
        &self,
        project: &str,
        schedule_id: u64,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!(
            "take_pipeline_schedule_ownership {} {}",
            project, schedule_id
        ))?;
        let existing = state
            .schedules
            .get_mut(&project_key(project))
            .and_then(|all| all.iter_mut().find(|s| s.id == schedule_id))
            .ok_or(Error::NotFound)?;
        existing.owner = Some(User {
            id: 1,
            username: TOKEN_OWNER.to_string(),
            bot: false,
        });
        Ok(())
    }

    async fn create_pipeline_schedule_variable(
        &self,
        project: &str,
        schedule_id: u64,
        variable: &PipelineScheduleVariable,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!(
            "create_pipeline_schedule_variable {} {} {}",
            project, schedule_id, variable.key
        ))?;
        let existing = state
            .schedules
            .get_mut(&project_key(project))
            .and_then(|all| all.iter_mut().find(|s| s.id == schedule_id))
            .ok_or(Error::NotFound)?;
        existing.variables.push(variable.clone());
        Ok(())
    }

    async fn update_pipeline_schedule_variable(
        &self,
        project: &str,
        schedule_id: u64,
        variable: &PipelineScheduleVariable,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!(
            "update_pipeline_schedule_variable {} {} {}",
            project, schedule_id, variable.key
        ))?;
        let existing = state
            .schedules
            .get_mut(&project_key(project))
            .and_then(|all| all.iter_mut().find(|s| s.id == schedule_id))
            .and_then(|s| s.variables.iter_mut().find(|v| v.key == variable.key))
            .ok_or(Error::NotFound)?;
        *existing = variable.clone();
        Ok(())
    }

    async fn delete_pipeline_schedule_variable(
        &self,
        project: &str,
        schedule_id: u64,
        key: &str,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!(
            "delete_pipeline_schedule_variable {} {} {}",
            project, schedule_id, key
        ))?;
        if let Some(schedule) = state
            .schedules
            .get_mut(&project_key(project))
            .and_then(|all| all.iter_mut().find(|s| s.id == schedule_id))
        {
            schedule.variables.retain(|v| v.key != key);
        }
        Ok(())
    }

    async fn list_labels(&self, scope: &Scope) -> GitLabResult<Vec<Label>> {
        Ok(self.state().labels.get(&key(scope)).cloned().unwrap_or_default())
    }

    async fn create_label(&self, scope: &Scope, label: &LabelPayload) -> GitLabResult<()> {
        let name = label.name.clone().unwrap_or_default();
        let mut state = self.record(format!("create_label {} {}", scope, name))?;
        let id = state.next_id();
        state.labels.entry(key(scope)).or_default().push(Label {
            id,
            name,
            color: label.color.clone(),
            description: label.description.clone(),
            priority: label.priority,
        });
        Ok(())
    }

    async fn update_label(
        &self,
        scope: &Scope,
        label_id: u64,
        label: &LabelPayload,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!("update_label {} {}", scope, label_id))?;
        let existing = state
            .labels
            .get_mut(&key(scope))
            .and_then(|all| all.iter_mut().find(|l| l.id == label_id))
            .ok_or(Error::NotFound)?;
        existing.color = label.color.clone();
        existing.description = label.description.clone();
        existing.priority = label.priority;
        Ok(())
    }

    async fn delete_label(&self, scope: &Scope, label_id: u64) -> GitLabResult<()> {
        let mut state = self.record(format!("delete_label {} {}", scope, label_id))?;
        if let Some(all) = state.labels.get_mut(&key(scope)) {
            all.retain(|l| l.id != label_id);
        }
        Ok(())
    }

    async fn list_variables(&self, scope: &Scope) -> GitLabResult<Vec<Variable>> {
        Ok(self
            .state()
            .variables
            .get(&key(scope))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_variable(&self, scope: &Scope, variable: &Variable) -> GitLabResult<()> {
        let mut state = self.record(format!(
            "create_variable {} {} {}",
            scope, variable.key, variable.environment_scope
        ))?;
        state
            .variables
            .entry(key(scope))
            .or_default()
            .push(variable.clone());
        Ok(())
    }

    async fn update_variable(&self, scope: &Scope, variable: &Variable) -> GitLabResult<()> {
        let mut state = self.record(format!(
            "update_variable {} {} {}",
            scope, variable.key, variable.environment_scope
        ))?;
        let existing = state
            .variables
            .get_mut(&key(scope))
            .and_then(|all| {
                all.iter_mut().find(|v| {
                    v.key == variable.key && v.environment_scope == variable.environment_scope
                })
            })
            .ok_or(Error::NotFound)?;
        *existing = variable.clone();
        Ok(())
    }

    async fn delete_variable(
        &self,
        scope: &Scope,
        key_name: &str,
        environment_scope: &str,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!(
            "delete_variable {} {} {}",
            scope, key_name, environment_scope
        ))?;
        if let Some(all) = state.variables.get_mut(&key(scope)) {
            all.retain(|v| !(v.key == key_name && v.environment_scope == environment_scope));
        }
        Ok(())
    }

    async fn list_badges(&self, scope: &Scope) -> GitLabResult<Vec<Badge>> {
        Ok(self.state().badges.get(&key(scope)).cloned().unwrap_or_default())
    }

    async fn create_badge(&self, scope: &Scope, badge: &BadgePayload) -> GitLabResult<()> {
        let mut state = self.record(format!("create_badge {} {}", scope, badge.name))?;
        let id = state.next_id();
        state.badges.entry(key(scope)).or_default().push(Badge {
            id,
            name: Some(badge.name.clone()),
            link_url: badge.link_url.clone(),
            image_url: badge.image_url.clone(),
            kind: Some(scope.kind().to_string()),
        });
        Ok(())
    }

    async fn update_badge(
        &self,
        scope: &Scope,
        badge_id: u64,
        badge: &BadgePayload,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!("update_badge {} {}", scope, badge_id))?;
        let existing = state
            .badges
            .get_mut(&key(scope))
            .and_then(|all| all.iter_mut().find(|b| b.id == badge_id))
            .ok_or(Error::NotFound)?;
        existing.link_url = badge.link_url.clone();
        existing.image_url = badge.image_url.clone();
        Ok(())
    }

    async fn delete_badge(&self, scope: &Scope, badge_id: u64) -> GitLabResult<()> {
        let mut state = self.record(format!("delete_badge {} {}", scope, badge_id))?;
        if let Some(all) = state.badges.get_mut(&key(scope)) {
            all.retain(|b| b.id != badge_id);
        }
        Ok(())
    }

    async fn list_hooks(&self, project: &str) -> GitLabResult<Vec<Hook>> {
        Ok(self
            .state()
            .hooks
            .get(&project_key(project))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_hook(&self, project: &str, hook: &Map<String, Value>) -> GitLabResult<()> {
        let url = hook
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let mut state = self.record(format!("create_hook {} {}", project, url))?;
        let id = state.next_id();
        let mut attributes = hook.clone();
        attributes.remove("url");
        attributes.remove("token");
        state
            .hooks
            .entry(project_key(project))
            .or_default()
            .push(Hook { id, url, attributes });
        Ok(())
    }

    async fn update_hook(
        &self,
        project: &str,
        hook_id: u64,
        hook: &Map<String, Value>,
    ) -> GitLabResult<()> {
        let mut state = self.record(format!("update_hook {} {}", project, hook_id))?;
        let existing = state
            .hooks
            .get_mut(&project_key(project))
            .and_then(|all| all.iter_mut().find(|h| h.id == hook_id))
            .ok_or(Error::NotFound)?;
        for (name, value) in hook {
            if name != "url" && name != "token" {
                existing.attributes.insert(name.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete_hook(&self, project: &str, hook_id: u64) -> GitLabResult<()> {
        let mut state = self.record(format!("delete_hook {} {}", project, hook_id))?;
        if let Some(all) = state.hooks.get_mut(&project_key(project)) {
            all.retain(|h| h.id != hook_id);
        }
        Ok(())
    }
}
