use chrono::Utc;
use tracing::info;

use super::policy::{self, Actor};
use super::mint_id;
use crate::db::models::counter::Sequence;
use crate::db::models::pagination::{Page, PageRequest};
use crate::db::models::project::{
    NewProject, Project, ProjectFilter, ProjectListParams, UpdateProject,
};
use crate::db::models::user::Role;
use crate::db::Repositories;
use crate::error::{AppError, StoreContext};
use crate::utils::validate;

#[derive(Clone)]
pub struct ProjectService {
    repos: Repositories,
}

fn check_progress(progress: i32) -> Result<(), AppError> {
    if !(0..=100).contains(&progress) {
        return Err(AppError::Validation("progress must be between 0 and 100".into()));
    }
    Ok(())
}

/// De-duplicates `ids` (first occurrence wins) and checks that each one names
/// an existing employee.
pub(crate) async fn resolve_employees(
    repos: &Repositories,
    ids: &[String],
) -> Result<Vec<String>, AppError> {
    let mut resolved: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if resolved.iter().any(|seen| seen == id) {
            continue;
        }
        let user = repos.users.find_by_id(id).await.context("failed to load employee")?;
        match user {
            Some(user) if user.role == Role::Employee => resolved.push(user.id),
            _ => return Err(AppError::Validation(format!("{id} is not an employee"))),
        }
    }
    Ok(resolved)
}

impl ProjectService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn load(&self, id: &str) -> Result<Project, AppError> {
        self.repos
            .projects
            .find_by_id(id)
            .await
            .context("failed to load project")?
            .ok_or_else(|| AppError::not_found("project"))
    }

    pub async fn create(&self, actor: &Actor, payload: NewProject) -> Result<Project, AppError> {
        policy::admin_only(actor)?;
        let name = validate::required("name", &payload.name)?;

        let client_id = payload.client_id.trim();
        let client = self.repos.users.find_by_id(client_id).await.context("failed to load client")?;
        if !client.is_some_and(|c| c.role == Role::Client) {
            return Err(AppError::Validation(format!("{client_id} is not a client")));
        }
        let employee_ids = resolve_employees(&self.repos, &payload.employee_ids).await?;

        let id = mint_id(self.repos.counters.as_ref(), Sequence::Project).await?;
        let now = Utc::now();
        let project = Project {
            id,
            name,
            description: payload.description.trim().to_string(),
            client_id: client_id.to_string(),
            status: payload.status.unwrap_or_default(),
            progress: 0,
            employee_ids,
            created_at: now,
            updated_at: now,
        };
        self.repos.projects.create(&project).await.context("failed to create project")?;
        info!("Created project {} for {}", project.id, project.client_id);
        Ok(project)
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> Result<Project, AppError> {
        let project = self.load(id).await?;
        policy::view_project(actor, &project)?;
        Ok(project)
    }

    pub async fn update(&self, actor: &Actor, id: &str, patch: UpdateProject) -> Result<Project, AppError> {
        if patch.is_empty() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        let mut project = self.load(id).await?;
        policy::update_project(actor, &project, &patch)?;

        if let Some(name) = patch.name {
            project.name = validate::required("name", &name)?;
        }
        if let Some(description) = patch.description {
            project.description = description.trim().to_string();
        }
        if let Some(progress) = patch.progress {
            check_progress(progress)?;
            project.progress = progress;
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        self.save(project).await
    }

    pub async fn update_progress(&self, actor: &Actor, id: &str, progress: i32) -> Result<Project, AppError> {
        check_progress(progress)?;
        let mut project = self.load(id).await?;
        policy::view_project(actor, &project)?;
        project.progress = progress;
        self.save(project).await
    }

    async fn save(&self, project: Project) -> Result<Project, AppError> {
        let updated = self.repos.projects.update(&project).await.context("failed to update project")?;
        if !updated {
            return Err(AppError::not_found("project"));
        }
        self.load(&project.id).await
    }

    /// Replaces the project's employee set.
    pub async fn assign_employees(
        &self,
        actor: &Actor,
        id: &str,
        employee_ids: &[String],
    ) -> Result<Project, AppError> {
        policy::admin_only(actor)?;
        self.load(id).await?;
        let employee_ids = resolve_employees(&self.repos, employee_ids).await?;
        let assigned = self
            .repos
            .projects
            .assign_employees(id, &employee_ids)
            .await
            .context("failed to assign employees")?;
        if !assigned {
            return Err(AppError::not_found("project"));
        }
        info!("Assigned {:?} to project {id}", employee_ids);
        self.load(id).await
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), AppError> {
        policy::admin_only(actor)?;
        let deleted = self.repos.projects.delete(id).await.context("failed to delete project")?;
        if !deleted {
            return Err(AppError::not_found("project"));
        }
        info!("Deleted project {id}");
        Ok(())
    }

    pub async fn list(&self, actor: &Actor, params: ProjectListParams) -> Result<Page<Project>, AppError> {
        let page = PageRequest::new(params.page, params.page_size)?;
        let mut filter = ProjectFilter {
            search: validate::optional(params.search),
            status: params.status,
            client_id: validate::optional(params.client_id),
            employee_id: None,
        };
        policy::scope_projects(actor, &mut filter);
        let (projects, total) = self
            .repos
            .projects
            .list(&filter, page)
            .await
            .context("failed to list projects")?;
        Ok(Page::new(projects, total, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::project::ProjectStatus;
    use crate::db::models::user::{NewUser, User};
    use crate::error::ErrorKind;
    use crate::services::user::UserService;
    use tokio_test::assert_ok;

    struct Fixture {
        projects: ProjectService,
        admin: Actor,
        client: User,
        other_client: User,
        employee: User,
    }

    async fn fixture() -> Fixture {
        let repos = Repositories::in_memory();
        let users = UserService::new(repos.clone(), 4);
        let person = |email: &str| NewUser {
            email: email.into(),
            password: "secret1".into(),
            name: email.into(),
            ..Default::default()
        };
        let admin = assert_ok!(users.insert(Role::Admin, person("root@agency.io")).await);
        let client = assert_ok!(users.insert(Role::Client, person("a@corp.io")).await);
        let other_client = assert_ok!(users.insert(Role::Client, person("b@corp.io")).await);
        let employee = assert_ok!(users.insert(Role::Employee, person("dev@agency.io")).await);
        Fixture {
            projects: ProjectService::new(repos),
            admin: Actor::from(&admin),
            client,
            other_client,
            employee,
        }
    }

    fn new_project(client_id: &str, employees: &[&str]) -> NewProject {
        NewProject {
            name: "Website".into(),
            description: "Marketing site".into(),
            client_id: client_id.into(),
            status: None,
            employee_ids: employees.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn create_defaults_and_dedupes_employees() {
        let f = fixture().await;
        let emp = f.employee.id.as_str();
        let project = assert_ok!(
            f.projects.create(&f.admin, new_project(&f.client.id, &[emp, emp])).await
        );
        assert_eq!(project.id, "PROJECT01");
        assert_eq!(project.status, ProjectStatus::Pending);
        assert_eq!(project.progress, 0);
        assert_eq!(project.employee_ids, vec![f.employee.id.clone()]);
    }

    #[tokio::test]
    async fn create_rejects_non_client_owner_and_non_employee_members() {
        let f = fixture().await;
        let err = f.projects.create(&f.admin, new_project(&f.employee.id, &[])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = f
            .projects
            .create(&f.admin, new_project(&f.client.id, &[f.other_client.id.as_str()]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = f
            .projects
            .create(&Actor::from(&f.client), new_project(&f.client.id, &[]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn unassigned_employee_update_is_forbidden() {
        let f = fixture().await;
        let project = assert_ok!(f.projects.create(&f.admin, new_project(&f.client.id, &[])).await);
        let patch = UpdateProject { progress: Some(40), ..Default::default() };
        let err = f
            .projects
            .update(&Actor::from(&f.employee), &project.id, patch)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "access denied: employee not assigned to this project");
    }

    #[tokio::test]
    async fn assigned_employee_moves_status_and_progress() {
        let f = fixture().await;
        let project = assert_ok!(
            f.projects.create(&f.admin, new_project(&f.client.id, &[f.employee.id.as_str()])).await
        );
        let patch = UpdateProject {
            status: Some(ProjectStatus::InProgress),
            progress: Some(40),
            ..Default::default()
        };
        let updated = assert_ok!(f.projects.update(&Actor::from(&f.employee), &project.id, patch).await);
        assert_eq!(updated.status, ProjectStatus::InProgress);
        assert_eq!(updated.progress, 40);
        assert_eq!(updated.name, "Website");
    }

    #[tokio::test]
    async fn progress_is_bounded() {
        let f = fixture().await;
        let project = assert_ok!(f.projects.create(&f.admin, new_project(&f.client.id, &[])).await);
        let owner = Actor::from(&f.client);
        let err = f.projects.update_progress(&owner, &project.id, 101).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let updated = assert_ok!(f.projects.update_progress(&owner, &project.id, 100).await);
        assert_eq!(updated.progress, 100);

        let stranger = Actor::from(&f.other_client);
        let err = f.projects.update_progress(&stranger, &project.id, 10).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn client_listing_is_scoped_and_paginated() {
        let f = fixture().await;
        for _ in 0..12 {
            assert_ok!(f.projects.create(&f.admin, new_project(&f.client.id, &[])).await);
        }
        for _ in 0..3 {
            assert_ok!(f.projects.create(&f.admin, new_project(&f.other_client.id, &[])).await);
        }

        let params = ProjectListParams {
            page: Some(1),
            page_size: Some(10),
            search: None,
            status: None,
            client_id: Some(f.other_client.id.clone()),
        };
        let page = assert_ok!(f.projects.list(&Actor::from(&f.client), params).await);
        assert_eq!(page.total, 12);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 2);
        assert!(page.items.iter().all(|p| p.client_id == f.client.id));
    }

    #[tokio::test]
    async fn missing_project_is_not_found_before_policy() {
        let f = fixture().await;
        let err = f.projects.get(&Actor::from(&f.employee), "PROJECT99").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn assign_replaces_the_set() {
        let f = fixture().await;
        let project = assert_ok!(
            f.projects.create(&f.admin, new_project(&f.client.id, &[f.employee.id.as_str()])).await
        );
        let updated = assert_ok!(f.projects.assign_employees(&f.admin, &project.id, &[]).await);
        assert!(updated.employee_ids.is_empty());
    }
}
