//! Crate for interacting with the GitLab REST API (v4).
//!
//! This crate provides a client for making authenticated requests to GitLab using a
//! personal, group or project access token. All operations GitLabForm needs are exposed
//! through the [`GitLabApi`] trait so that callers can substitute an in-memory
//! implementation in tests.
//!
//! Entities are addressed by their full path; the client takes care of URL-encoding the
//! path and of following GitLab's pagination headers for listings.

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use url::Url;

pub mod errors;
pub use errors::{Error, GitLabResult};

pub mod models;
pub use models::{Group, MemberRole, Namespace, Project, SharedGroup, User};

mod badge;
mod hook;
mod label;
mod member;
mod pipeline_schedule;
mod saml_link;
mod scope;
mod variable;

pub use badge::{Badge, BadgePayload};
pub use hook::Hook;
pub use label::{Label, LabelPayload};
pub use member::{
    AccessLevel, AddMemberPayload, Member, MemberRoleRef, ShareWithGroupPayload,
    UpdateMemberPayload,
};
pub use pipeline_schedule::{
    PipelineSchedule, PipelineSchedulePayload, PipelineScheduleVariable, DEFAULT_VARIABLE_TYPE,
};
pub use saml_link::{SamlGroupLink, SamlGroupLinkPayload};
pub use scope::{EntityKind, Scope};
pub use variable::{Variable, DEFAULT_ENVIRONMENT_SCOPE};

use scope::encode_path;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

const PER_PAGE: &str = "100";
const NEXT_PAGE_HEADER: &str = "x-next-page";
const TOKEN_HEADER: &str = "private-token";
const SAAS_HOST: &str = "gitlab.com";

/// Connection settings for a GitLab instance.
#[derive(Debug)]
pub struct ClientSettings {
    /// Base URL of the instance, e.g. `https://gitlab.example.com`
    pub url: String,
    pub token: SecretString,
    /// Verify the server's TLS certificate
    pub ssl_verify: bool,
    /// Timeout applied to every request
    pub timeout: Duration,
}

/// Trait for all GitLab operations used during reconciliation.
///
/// Every call is a single HTTP request (or, for listings, a sequence of page requests).
/// Implementations must return [`Error::NotFound`] when the addressed entity does not
/// exist so callers can distinguish "skip this item" from "abort".
#[async_trait]
pub trait GitLabApi: Send + Sync {
    /// Fetches a project by its full path.
    async fn get_project(&self, path: &str) -> GitLabResult<Project>;

    /// Fetches a group by its full path.
    async fn get_group(&self, path: &str) -> GitLabResult<Group>;

    /// Lists every project visible to the token.
    async fn list_projects(&self) -> GitLabResult<Vec<Project>>;

    /// Lists every group visible to the token.
    async fn list_groups(&self) -> GitLabResult<Vec<Group>>;

    /// Lists the projects of a group, including those in its subgroups.
    async fn list_group_projects(&self, group: &str) -> GitLabResult<Vec<Project>>;

    /// Lists all groups below a group, at any depth.
    async fn list_descendant_groups(&self, group: &str) -> GitLabResult<Vec<Group>>;

    /// Returns the raw attributes of a project or group.
    async fn get_settings(&self, scope: &Scope) -> GitLabResult<Value>;

    /// Changes the given attributes of a project or group.
    async fn update_settings(&self, scope: &Scope, settings: &Map<String, Value>)
        -> GitLabResult<()>;

    /// Looks a user up by username. Returns `Ok(None)` when no such user exists.
    async fn find_user_by_username(&self, username: &str) -> GitLabResult<Option<User>>;

    /// Lists custom member roles of a top-level group, or of the instance when
    /// `group_id` is `None`.
    async fn list_member_roles(&self, group_id: Option<u64>) -> GitLabResult<Vec<MemberRole>>;

    /// Whether the client talks to gitlab.com rather than a self-managed instance.
    fn is_saas(&self) -> bool;

    async fn list_members(&self, scope: &Scope) -> GitLabResult<Vec<Member>>;

    async fn add_member(&self, scope: &Scope, member: &AddMemberPayload) -> GitLabResult<()>;

    async fn update_member(
        &self,
        scope: &Scope,
        user_id: u64,
        member: &UpdateMemberPayload,
    ) -> GitLabResult<()>;

    async fn remove_member(&self, scope: &Scope, user_id: u64) -> GitLabResult<()>;

    async fn share_with_group(
        &self,
        scope: &Scope,
        share: &ShareWithGroupPayload,
    ) -> GitLabResult<()>;

    async fn unshare_with_group(&self, scope: &Scope, group_id: u64) -> GitLabResult<()>;

    async fn list_saml_links(&self, group: &str) -> GitLabResult<Vec<SamlGroupLink>>;

    async fn create_saml_link(
        &self,
        group: &str,
        link: &SamlGroupLinkPayload,
    ) -> GitLabResult<()>;

    async fn delete_saml_link(&self, group: &str, saml_group_name: &str) -> GitLabResult<()>;

    /// Lists the pipeline schedules of a project, without their variables.
    async fn list_pipeline_schedules(&self, project: &str)
        -> GitLabResult<Vec<PipelineSchedule>>;

    /// Fetches a single pipeline schedule including its variables.
    async fn get_pipeline_schedule(
        &self,
        project: &str,
        schedule_id: u64,
    ) -> GitLabResult<PipelineSchedule>;

    async fn create_pipeline_schedule(
        &self,
        project: &str,
        schedule: &PipelineSchedulePayload,
    ) -> GitLabResult<PipelineSchedule>;

    async fn update_pipeline_schedule(
        &self,
        project: &str,
        schedule_id: u64,
        schedule: &PipelineSchedulePayload,
    ) -> GitLabResult<()>;

    async fn delete_pipeline_schedule(&self, project: &str, schedule_id: u64)
        -> GitLabResult<()>;

    /// Makes the token's user the owner of the schedule.
    async fn take_pipeline_schedule_ownership(
        &self,
        project: &str,
        schedule_id: u64,
    ) -> GitLabResult<()>;

    async fn create_pipeline_schedule_variable(
        &self,
        project: &str,
        schedule_id: u64,
        variable: &PipelineScheduleVariable,
    ) -> GitLabResult<()>;

    async fn update_pipeline_schedule_variable(
        &self,
        project: &str,
        schedule_id: u64,
        variable: &PipelineScheduleVariable,
    ) -> GitLabResult<()>;

    async fn delete_pipeline_schedule_variable(
        &self,
        project: &str,
        schedule_id: u64,
        key: &str,
    ) -> GitLabResult<()>;

    /// Lists the labels defined directly on the project or group.
    async fn list_labels(&self, scope: &Scope) -> GitLabResult<Vec<Label>>;

    async fn create_label(&self, scope: &Scope, label: &LabelPayload) -> GitLabResult<()>;

    async fn update_label(
        &self,
        scope: &Scope,
        label_id: u64,
        label: &LabelPayload,
    ) -> GitLabResult<()>;

    async fn delete_label(&self, scope: &Scope, label_id: u64) -> GitLabResult<()>;

    async fn list_variables(&self, scope: &Scope) -> GitLabResult<Vec<Variable>>;

    async fn create_variable(&self, scope: &Scope, variable: &Variable) -> GitLabResult<()>;

    async fn update_variable(&self, scope: &Scope, variable: &Variable) -> GitLabResult<()>;

    async fn delete_variable(
        &self,
        scope: &Scope,
        key: &str,
        environment_scope: &str,
    ) -> GitLabResult<()>;

    /// Lists the badges owned by the project or group, skipping inherited ones.
    async fn list_badges(&self, scope: &Scope) -> GitLabResult<Vec<Badge>>;

    async fn create_badge(&self, scope: &Scope, badge: &BadgePayload) -> GitLabResult<()>;

    async fn update_badge(
        &self,
        scope: &Scope,
        badge_id: u64,
        badge: &BadgePayload,
    ) -> GitLabResult<()>;

    async fn delete_badge(&self, scope: &Scope, badge_id: u64) -> GitLabResult<()>;

    async fn list_hooks(&self, project: &str) -> GitLabResult<Vec<Hook>>;

    /// Creates a hook; `hook` must contain the `url` attribute.
    async fn create_hook(&self, project: &str, hook: &Map<String, Value>) -> GitLabResult<()>;

    async fn update_hook(
        &self,
        project: &str,
        hook_id: u64,
        hook: &Map<String, Value>,
    ) -> GitLabResult<()>;

    async fn delete_hook(&self, project: &str, hook_id: u64) -> GitLabResult<()>;
}

/// A client for the GitLab REST API, authenticated with an access token.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: Client,
    api_url: Url,
}

impl GitLabClient {
    /// Creates a new `GitLabClient` from an already configured HTTP client.
    ///
    /// `api_url` must point at the API root and end with a slash, e.g.
    /// `https://gitlab.example.com/api/v4/`.
    pub fn new(client: Client, api_url: Url) -> Self {
        Self { client, api_url }
    }

    fn endpoint(&self, path: &str) -> GitLabResult<Url> {
        self.api_url.join(path).map_err(|e| {
            Error::InvalidConfiguration(format!("Cannot build API URL for '{}': {}", path, e))
        })
    }

    async fn send(&self, request: RequestBuilder) -> GitLabResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        let err = match status {
            StatusCode::NOT_FOUND => Error::NotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(message),
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        };
        log_gitlab_error(url.path(), &err);
        Err(err)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> GitLabResult<T> {
        let url = self.endpoint(path)?;
        let response = self.send(self.client.get(url).query(query)).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches every page of a listing, following the `x-next-page` header.
    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> GitLabResult<Vec<T>> {
        let url = self.endpoint(path)?;
        let mut items = Vec::new();
        let mut page = "1".to_string();

        loop {
            let request = self
                .client
                .get(url.clone())
                .query(query)
                .query(&[("per_page", PER_PAGE), ("page", page.as_str())]);
            let response = self.send(request).await?;
            let next_page = response
                .headers()
                .get(NEXT_PAGE_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            let body = response.bytes().await?;
            let mut batch: Vec<T> = serde_json::from_slice(&body)?;
            debug!(path = path, page = %page, count = batch.len(), "Fetched page");
            items.append(&mut batch);

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(items)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> GitLabResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self.send(self.client.post(url).json(body)).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends a request whose response body is not needed.
    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> GitLabResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint(path)?;
        let mut request = self.client.request(method, url).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl GitLabApi for GitLabClient {
    #[instrument(skip(self))]
    async fn get_project(&self, path: &str) -> GitLabResult<Project> {
        self.get_json(&Scope::project(path).api_path(), &[]).await
    }

    #[instrument(skip(self))]
    async fn get_group(&self, path: &str) -> GitLabResult<Group> {
        self.get_json(&Scope::group(path).api_path(), &[]).await
    }

    #[instrument(skip(self))]
    async fn list_projects(&self) -> GitLabResult<Vec<Project>> {
        let projects: Vec<Project> = self.get_all("projects", &[("order_by", "id")]).await?;
        info!(count = projects.len(), "Retrieved all visible projects");
        Ok(projects)
    }

    #[instrument(skip(self))]
    async fn list_groups(&self) -> GitLabResult<Vec<Group>> {
        let groups: Vec<Group> = self.get_all("groups", &[("all_available", "true")]).await?;
        info!(count = groups.len(), "Retrieved all visible groups");
        Ok(groups)
    }

    #[instrument(skip(self))]
    async fn list_group_projects(&self, group: &str) -> GitLabResult<Vec<Project>> {
        let path = format!("{}/projects", Scope::group(group).api_path());
        self.get_all(&path, &[("include_subgroups", "true"), ("with_shared", "false")])
            .await
    }

    #[instrument(skip(self))]
    async fn list_descendant_groups(&self, group: &str) -> GitLabResult<Vec<Group>> {
        let path = format!("{}/descendant_groups", Scope::group(group).api_path());
        self.get_all(&path, &[]).await
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn get_settings(&self, scope: &Scope) -> GitLabResult<Value> {
        self.get_json(&scope.api_path(), &[]).await
    }

    #[instrument(skip(self, settings), fields(scope = %scope))]
    async fn update_settings(
        &self,
        scope: &Scope,
        settings: &Map<String, Value>,
    ) -> GitLabResult<()> {
        self.execute(Method::PUT, &scope.api_path(), &[], Some(settings))
            .await
    }

    #[instrument(skip(self))]
    async fn find_user_by_username(&self, username: &str) -> GitLabResult<Option<User>> {
        let users: Vec<User> = self.get_json("users", &[("username", username)]).await?;
        Ok(users
            .into_iter()
            .find(|user| user.username.eq_ignore_ascii_case(username)))
    }

    #[instrument(skip(self))]
    async fn list_member_roles(&self, group_id: Option<u64>) -> GitLabResult<Vec<MemberRole>> {
        match group_id {
            Some(id) => self.get_all(&format!("groups/{}/member_roles", id), &[]).await,
            None => self.get_all("member_roles", &[]).await,
        }
    }

    fn is_saas(&self) -> bool {
        self.api_url.host_str() == Some(SAAS_HOST)
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn list_members(&self, scope: &Scope) -> GitLabResult<Vec<Member>> {
        self.get_all(&format!("{}/members", scope.api_path()), &[])
            .await
    }

    #[instrument(skip(self, member), fields(scope = %scope, user_id = member.user_id))]
    async fn add_member(&self, scope: &Scope, member: &AddMemberPayload) -> GitLabResult<()> {
        let path = format!("{}/members", scope.api_path());
        self.execute(Method::POST, &path, &[], Some(member)).await
    }

    #[instrument(skip(self, member), fields(scope = %scope))]
    async fn update_member(
        &self,
        scope: &Scope,
        user_id: u64,
        member: &UpdateMemberPayload,
    ) -> GitLabResult<()> {
        let path = format!("{}/members/{}", scope.api_path(), user_id);
        self.execute(Method::PUT, &path, &[], Some(member)).await
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn remove_member(&self, scope: &Scope, user_id: u64) -> GitLabResult<()> {
        let path = format!("{}/members/{}", scope.api_path(), user_id);
        self.execute(Method::DELETE, &path, &[], None::<&()>).await
    }

    #[instrument(skip(self, share), fields(scope = %scope, group_id = share.group_id))]
    async fn share_with_group(
        &self,
        scope: &Scope,
        share: &ShareWithGroupPayload,
    ) -> GitLabResult<()> {
        let path = format!("{}/share", scope.api_path());
        self.execute(Method::POST, &path, &[], Some(share)).await
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn unshare_with_group(&self, scope: &Scope, group_id: u64) -> GitLabResult<()> {
        let path = format!("{}/share/{}", scope.api_path(), group_id);
        self.execute(Method::DELETE, &path, &[], None::<&()>).await
    }

    #[instrument(skip(self))]
    async fn list_saml_links(&self, group: &str) -> GitLabResult<Vec<SamlGroupLink>> {
        let path = format!("{}/saml_group_links", Scope::group(group).api_path());
        self.get_json(&path, &[]).await
    }

    #[instrument(skip(self, link), fields(saml_group_name = %link.saml_group_name))]
    async fn create_saml_link(
        &self,
        group: &str,
        link: &SamlGroupLinkPayload,
    ) -> GitLabResult<()> {
        let path = format!("{}/saml_group_links", Scope::group(group).api_path());
        self.execute(Method::POST, &path, &[], Some(link)).await
    }

    #[instrument(skip(self))]
    async fn delete_saml_link(&self, group: &str, saml_group_name: &str) -> GitLabResult<()> {
        let path = format!(
            "{}/saml_group_links/{}",
            Scope::group(group).api_path(),
            encode_path(saml_group_name)
        );
        self.execute(Method::DELETE, &path, &[], None::<&()>).await
    }

    #[instrument(skip(self))]
    async fn list_pipeline_schedules(
        &self,
        project: &str,
    ) -> GitLabResult<Vec<PipelineSchedule>> {
        let path = format!("{}/pipeline_schedules", Scope::project(project).api_path());
        self.get_all(&path, &[]).await
    }

    #[instrument(skip(self))]
    async fn get_pipeline_schedule(
        &self,
        project: &str,
        schedule_id: u64,
    ) -> GitLabResult<PipelineSchedule> {
        let path = format!(
            "{}/pipeline_schedules/{}",
            Scope::project(project).api_path(),
            schedule_id
        );
        self.get_json(&path, &[]).await
    }

    #[instrument(skip(self, schedule))]
    async fn create_pipeline_schedule(
        &self,
        project: &str,
        schedule: &PipelineSchedulePayload,
    ) -> GitLabResult<PipelineSchedule> {
        let path = format!("{}/pipeline_schedules", Scope::project(project).api_path());
        self.post_json(&path, schedule).await
    }

    #[instrument(skip(self, schedule))]
    async fn update_pipeline_schedule(
        &self,
        project: &str,
        schedule_id: u64,
        schedule: &PipelineSchedulePayload,
    ) -> GitLabResult<()> {
        let path = format!(
            "{}/pipeline_schedules/{}",
            Scope::project(project).api_path(),
            schedule_id
        );
        self.execute(Method::PUT, &path, &[], Some(schedule)).await
    }

    #[instrument(skip(self))]
    async fn delete_pipeline_schedule(
        &self,
        project: &str,
        schedule_id: u64,
    ) -> GitLabResult<()> {
        let path = format!(
            "{}/pipeline_schedules/{}",
            Scope::project(project).api_path(),
            schedule_id
        );
        self.execute(Method::DELETE, &path, &[], None::<&()>).await
    }

    #[instrument(skip(self))]
    async fn take_pipeline_schedule_ownership(
        &self,
        project: &str,
        schedule_id: u64,
    ) -> GitLabResult<()> {
        let path = format!(
            "{}/pipeline_schedules/{}/take_ownership",
            Scope::project(project).api_path(),
            schedule_id
        );
        self.execute(Method::POST, &path, &[], None::<&()>).await
    }

    #[instrument(skip(self, variable), fields(key = %variable.key))]
    async fn create_pipeline_schedule_variable(
        &self,
        project: &str,
        schedule_id: u64,
        variable: &PipelineScheduleVariable,
    ) -> GitLabResult<()> {
        let path = format!(
            "{}/pipeline_schedules/{}/variables",
            Scope::project(project).api_path(),
            schedule_id
        );
        self.execute(Method::POST, &path, &[], Some(variable)).await
    }

    #[instrument(skip(self, variable), fields(key = %variable.key))]
    async fn update_pipeline_schedule_variable(
        &self,
        project: &str,
        schedule_id: u64,
        variable: &PipelineScheduleVariable,
    ) -> GitLabResult<()> {
        let path = format!(
            "{}/pipeline_schedules/{}/variables/{}",
            Scope::project(project).api_path(),
            schedule_id,
            encode_path(&variable.key)
        );
        self.execute(Method::PUT, &path, &[], Some(variable)).await
    }

    #[instrument(skip(self))]
    async fn delete_pipeline_schedule_variable(
        &self,
        project: &str,
        schedule_id: u64,
        key: &str,
    ) -> GitLabResult<()> {
        let path = format!(
            "{}/pipeline_schedules/{}/variables/{}",
            Scope::project(project).api_path(),
            schedule_id,
            encode_path(key)
        );
        self.execute(Method::DELETE, &path, &[], None::<&()>).await
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn list_labels(&self, scope: &Scope) -> GitLabResult<Vec<Label>> {
        let path = format!("{}/labels", scope.api_path());
        self.get_all(&path, &[("include_ancestor_groups", "false")])
            .await
    }

    #[instrument(skip(self, label), fields(scope = %scope))]
    async fn create_label(&self, scope: &Scope, label: &LabelPayload) -> GitLabResult<()> {
        let path = format!("{}/labels", scope.api_path());
        self.execute(Method::POST, &path, &[], Some(label)).await
    }

    #[instrument(skip(self, label), fields(scope = %scope))]
    async fn update_label(
        &self,
        scope: &Scope,
        label_id: u64,
        label: &LabelPayload,
    ) -> GitLabResult<()> {
        let path = format!("{}/labels/{}", scope.api_path(), label_id);
        self.execute(Method::PUT, &path, &[], Some(label)).await
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn delete_label(&self, scope: &Scope, label_id: u64) -> GitLabResult<()> {
        let path = format!("{}/labels/{}", scope.api_path(), label_id);
        self.execute(Method::DELETE, &path, &[], None::<&()>).await
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn list_variables(&self, scope: &Scope) -> GitLabResult<Vec<Variable>> {
        self.get_all(&format!("{}/variables", scope.api_path()), &[])
            .await
    }

    #[instrument(skip(self, variable), fields(scope = %scope, key = %variable.key))]
    async fn create_variable(&self, scope: &Scope, variable: &Variable) -> GitLabResult<()> {
        let path = format!("{}/variables", scope.api_path());
        self.execute(Method::POST, &path, &[], Some(variable)).await
    }

    #[instrument(skip(self, variable), fields(scope = %scope, key = %variable.key))]
    async fn update_variable(&self, scope: &Scope, variable: &Variable) -> GitLabResult<()> {
        let path = format!(
            "{}/variables/{}",
            scope.api_path(),
            encode_path(&variable.key)
        );
        let query = [(
            "filter[environment_scope]",
            variable.environment_scope.as_str(),
        )];
        self.execute(Method::PUT, &path, &query, Some(variable))
            .await
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn delete_variable(
        &self,
        scope: &Scope,
        key: &str,
        environment_scope: &str,
    ) -> GitLabResult<()> {
        let path = format!("{}/variables/{}", scope.api_path(), encode_path(key));
        let query = [("filter[environment_scope]", environment_scope)];
        self.execute(Method::DELETE, &path, &query, None::<&()>)
            .await
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn list_badges(&self, scope: &Scope) -> GitLabResult<Vec<Badge>> {
        let badges: Vec<Badge> = self
            .get_all(&format!("{}/badges", scope.api_path()), &[])
            .await?;
        let own_kind = scope.kind().to_string();
        Ok(badges
            .into_iter()
            .filter(|badge| badge.kind.as_deref().map_or(true, |kind| kind == own_kind))
            .collect())
    }

    #[instrument(skip(self, badge), fields(scope = %scope))]
    async fn create_badge(&self, scope: &Scope, badge: &BadgePayload) -> GitLabResult<()> {
        let path = format!("{}/badges", scope.api_path());
        self.execute(Method::POST, &path, &[], Some(badge)).await
    }

    #[instrument(skip(self, badge), fields(scope = %scope))]
    async fn update_badge(
        &self,
        scope: &Scope,
        badge_id: u64,
        badge: &BadgePayload,
    ) -> GitLabResult<()> {
        let path = format!("{}/badges/{}", scope.api_path(), badge_id);
        self.execute(Method::PUT, &path, &[], Some(badge)).await
    }

    #[instrument(skip(self), fields(scope = %scope))]
    async fn delete_badge(&self, scope: &Scope, badge_id: u64) -> GitLabResult<()> {
        let path = format!("{}/badges/{}", scope.api_path(), badge_id);
        self.execute(Method::DELETE, &path, &[], None::<&()>).await
    }

    #[instrument(skip(self))]
    async fn list_hooks(&self, project: &str) -> GitLabResult<Vec<Hook>> {
        let path = format!("{}/hooks", Scope::project(project).api_path());
        self.get_all(&path, &[]).await
    }

    #[instrument(skip(self, hook))]
    async fn create_hook(&self, project: &str, hook: &Map<String, Value>) -> GitLabResult<()> {
        let path = format!("{}/hooks", Scope::project(project).api_path());
        self.execute(Method::POST, &path, &[], Some(hook)).await
    }

    #[instrument(skip(self, hook))]
    async fn update_hook(
        &self,
        project: &str,
        hook_id: u64,
        hook: &Map<String, Value>,
    ) -> GitLabResult<()> {
        let path = format!("{}/hooks/{}", Scope::project(project).api_path(), hook_id);
        self.execute(Method::PUT, &path, &[], Some(hook)).await
    }

    #[instrument(skip(self))]
    async fn delete_hook(&self, project: &str, hook_id: u64) -> GitLabResult<()> {
        let path = format!("{}/hooks/{}", Scope::project(project).api_path(), hook_id);
        self.execute(Method::DELETE, &path, &[], None::<&()>).await
    }
}

/// Creates a [`GitLabClient`] authenticated with an access token.
///
/// # Arguments
///
/// * `settings` - URL, token, TLS verification and timeout of the instance.
///
/// # Errors
///
/// Returns `Error::InvalidConfiguration` if the URL cannot be parsed or the token
/// cannot be used as a header value, and `Error::Http` if the HTTP client cannot be
/// built.
///
/// # Example
///
/// ```rust,no_run
/// use gitlab_client::{create_client, ClientSettings, GitLabApi};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), gitlab_client::Error> {
///     let client = create_client(&ClientSettings {
///         url: "https://gitlab.example.com".to_string(),
///         token: "glpat-example".to_string().into(),
///         ssl_verify: true,
///         timeout: Duration::from_secs(10),
///     })?;
///
///     let project = client.get_project("platform/api").await?;
///     println!("{} has id {}", project.path_with_namespace, project.id);
///     Ok(())
/// }
/// ```
#[instrument(skip(settings), fields(url = %settings.url))]
pub fn create_client(settings: &ClientSettings) -> GitLabResult<GitLabClient> {
    let api_url = Url::parse(&format!("{}/api/v4/", settings.url.trim_end_matches('/')))
        .map_err(|e| {
            Error::InvalidConfiguration(format!("'{}' is not a valid URL: {}", settings.url, e))
        })?;

    let mut token = header::HeaderValue::from_str(settings.token.expose_secret())
        .map_err(|_| {
            Error::InvalidConfiguration(
                "The token contains characters that are not allowed in an HTTP header"
                    .to_string(),
            )
        })?;
    token.set_sensitive(true);

    let mut headers = header::HeaderMap::new();
    headers.insert(TOKEN_HEADER, token);

    if !settings.ssl_verify {
        info!("TLS certificate verification is disabled");
    }

    let client = Client::builder()
        .default_headers(headers)
        .timeout(settings.timeout)
        .danger_accept_invalid_certs(!settings.ssl_verify)
        .user_agent(concat!("gitlabform/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(GitLabClient::new(client, api_url))
}

/// Extracts the human readable part of a GitLab error body.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|value| value.get("message").or_else(|| value.get("error")));
    match message {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => body.trim().to_string(),
    }
}

fn log_gitlab_error(path: &str, e: &Error) {
    match e {
        Error::NotFound => debug!(path = path, "GitLab reported the resource as not found"),
        Error::Unauthorized(message) => error!(
            path = path,
            error_message = message.as_str(),
            "GitLab rejected the token for this request"
        ),
        Error::Api { status, message } => error!(
            path = path,
            status = status,
            error_message = message.as_str(),
            "Received an error from GitLab"
        ),
        _ => error!(path = path, error_message = e.to_string(), "GitLab request failed"),
    }
}
