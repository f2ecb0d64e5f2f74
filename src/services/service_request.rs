//! Service requests and the approval workflow that turns a pending request
//! into a project.
//!
//! A request leaves `pending` exactly once. The move is a compare-and-set in
//! the store, so two admins approving at the same time produce one project;
//! the loser's freshly created project is deleted again.

use chrono::Utc;
use tracing::{info, warn};

use super::policy::{self, Actor};
use super::mint_id;
use super::project::resolve_employees;
use crate::db::models::counter::Sequence;
use crate::db::models::pagination::{Page, PageRequest};
use crate::db::models::project::{Project, ProjectStatus};
use crate::db::models::service_request::{
    NewServiceRequest, RequestStatus, ServiceRequest, ServiceRequestFilter, ServiceRequestListParams,
    UpdateServiceRequest,
};
use crate::db::Repositories;
use crate::error::{AppError, StoreContext};
use crate::utils::validate;

const NOT_PENDING: &str = "service request is not pending";

#[derive(Clone)]
pub struct ServiceRequestService {
    repos: Repositories,
}

impl ServiceRequestService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn load(&self, id: &str) -> Result<ServiceRequest, AppError> {
        self.repos
            .service_requests
            .find_by_id(id)
            .await
            .context("failed to load service request")?
            .ok_or_else(|| AppError::not_found("service request"))
    }

    async fn load_pending(&self, id: &str) -> Result<ServiceRequest, AppError> {
        let request = self.load(id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::Validation(NOT_PENDING.into()));
        }
        Ok(request)
    }

    pub async fn create(&self, actor: &Actor, payload: NewServiceRequest) -> Result<ServiceRequest, AppError> {
        policy::create_service_request(actor)?;
        let title = validate::required("title", &payload.title)?;

        let id = mint_id(self.repos.counters.as_ref(), Sequence::ServiceRequest).await?;
        let now = Utc::now();
        let request = ServiceRequest {
            id,
            title,
            description: payload.description.trim().to_string(),
            client_id: actor.id.clone(),
            project_id: None,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.repos
            .service_requests
            .create(&request)
            .await
            .context("failed to create service request")?;
        info!("Client {} opened service request {}", actor.id, request.id);
        Ok(request)
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> Result<ServiceRequest, AppError> {
        let request = self.load(id).await?;
        policy::view_service_request(actor, &request)?;
        Ok(request)
    }

    /// Title and description only. Status moves through approve and reject.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        patch: UpdateServiceRequest,
    ) -> Result<ServiceRequest, AppError> {
        policy::update_service_request(actor)?;
        if patch.title.is_none() && patch.description.is_none() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        let mut request = self.load(id).await?;
        if let Some(title) = patch.title {
            request.title = validate::required("title", &title)?;
        }
        if let Some(description) = patch.description {
            request.description = description.trim().to_string();
        }
        let updated = self
            .repos
            .service_requests
            .update(&request)
            .await
            .context("failed to update service request")?;
        if !updated {
            return Err(AppError::not_found("service request"));
        }
        self.load(id).await
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), AppError> {
        policy::admin_only(actor)?;
        let deleted = self
            .repos
            .service_requests
            .delete(id)
            .await
            .context("failed to delete service request")?;
        if !deleted {
            return Err(AppError::not_found("service request"));
        }
        Ok(())
    }

    pub async fn list(
        &self,
        actor: &Actor,
        params: ServiceRequestListParams,
    ) -> Result<Page<ServiceRequest>, AppError> {
        let page = PageRequest::new(params.page, params.page_size)?;
        let mut filter = ServiceRequestFilter {
            search: validate::optional(params.search),
            status: params.status,
            client_id: None,
        };
        policy::scope_service_requests(actor, &mut filter);
        let (requests, total) = self
            .repos
            .service_requests
            .list(&filter, page)
            .await
            .context("failed to list service requests")?;
        Ok(Page::new(requests, total, page))
    }

    /// Creates the project for a pending request and marks the request active.
    pub async fn approve(
        &self,
        actor: &Actor,
        id: &str,
        employee_ids: &[String],
    ) -> Result<Project, AppError> {
        policy::admin_only(actor)?;
        let request = self.load_pending(id).await?;
        let employee_ids = resolve_employees(&self.repos, employee_ids).await?;

        let project_id = mint_id(self.repos.counters.as_ref(), Sequence::Project).await?;
        let now = Utc::now();
        let project = Project {
            id: project_id,
            name: request.title.clone(),
            description: request.description.clone(),
            client_id: request.client_id.clone(),
            status: ProjectStatus::Active,
            progress: 0,
            employee_ids,
            created_at: now,
            updated_at: now,
        };
        self.repos.projects.create(&project).await.context("failed to create project")?;

        let moved = self
            .repos
            .service_requests
            .transition(id, RequestStatus::Pending, RequestStatus::Active, Some(&project.id))
            .await;
        match moved {
            Ok(true) => {}
            Ok(false) => {
                self.discard_project(&project.id).await;
                return Err(match self.load(id).await {
                    Err(e) => e,
                    Ok(_) => AppError::Validation(NOT_PENDING.into()),
                });
            }
            Err(source) => {
                self.discard_project(&project.id).await;
                return Err(AppError::Storage {
                    context: "failed to mark service request approved".into(),
                    source,
                });
            }
        }

        info!("Approved service request {id} as project {}", project.id);
        self.repos
            .projects
            .find_by_id(&project.id)
            .await
            .context("failed to load project")?
            .ok_or_else(|| AppError::not_found("project"))
    }

    async fn discard_project(&self, project_id: &str) {
        match self.repos.projects.delete(project_id).await {
            Ok(_) => warn!("Rolled back project {project_id} after failed approval"),
            Err(e) => warn!("Could not roll back project {project_id}: {e}"),
        }
    }

    pub async fn reject(&self, actor: &Actor, id: &str) -> Result<ServiceRequest, AppError> {
        policy::admin_only(actor)?;
        self.load_pending(id).await?;
        let moved = self
            .repos
            .service_requests
            .transition(id, RequestStatus::Pending, RequestStatus::Rejected, None)
            .await
            .context("failed to reject service request")?;
        if !moved {
            self.load(id).await?;
            return Err(AppError::Validation(NOT_PENDING.into()));
        }
        info!("Rejected service request {id}");
        self.load(id).await
    }
}
