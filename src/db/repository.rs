//! Storage seams. Every store (PostgreSQL, in-process) implements these
//! traits; services only ever see `Arc<dyn …>`.

use async_trait::async_trait;

use crate::db::error::StoreError;
use crate::db::models::message::Message;
use crate::db::models::pagination::PageRequest;
use crate::db::models::project::{Project, ProjectFilter};
use crate::db::models::service_request::{RequestStatus, ServiceRequest, ServiceRequestFilter};
use crate::db::models::service_type::{ServiceType, ServiceTypeStatus};
use crate::db::models::user::{User, UserFilter};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Atomically increments the named counter and returns the new value.
    /// A counter that does not exist yet starts at 1.
    async fn next_sequence(&self, name: &str) -> StoreResult<i64>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> StoreResult<()>;
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Writes every mutable column of `user`. Returns false when no row matched.
    async fn update(&self, user: &User) -> StoreResult<bool>;
    async fn delete(&self, id: &str) -> StoreResult<bool>;
    async fn list(&self, filter: &UserFilter, page: PageRequest) -> StoreResult<(Vec<User>, i64)>;
    async fn count(&self, filter: &UserFilter) -> StoreResult<i64>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &Project) -> StoreResult<()>;
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Project>>;
    async fn update(&self, project: &Project) -> StoreResult<bool>;
    async fn assign_employees(&self, id: &str, employee_ids: &[String]) -> StoreResult<bool>;
    async fn delete(&self, id: &str) -> StoreResult<bool>;
    async fn list(&self, filter: &ProjectFilter, page: PageRequest) -> StoreResult<(Vec<Project>, i64)>;
    async fn count(&self, filter: &ProjectFilter) -> StoreResult<i64>;
    /// Ids of every project matching `filter`, unpaginated.
    async fn ids(&self, filter: &ProjectFilter) -> StoreResult<Vec<String>>;
}

#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    async fn create(&self, request: &ServiceRequest) -> StoreResult<()>;
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ServiceRequest>>;
    /// Writes title and description only. Status moves through `transition`.
    async fn update(&self, request: &ServiceRequest) -> StoreResult<bool>;
    /// Compare-and-set on status: moves the request from `from` to `to` (and
    /// sets `project_id` when given) only if it is still in `from`. Returns
    /// false when the request was missing or had already moved on.
    async fn transition(
        &self,
        id: &str,
        from: RequestStatus,
        to: RequestStatus,
        project_id: Option<&str>,
    ) -> StoreResult<bool>;
    async fn delete(&self, id: &str) -> StoreResult<bool>;
    async fn list(
        &self,
        filter: &ServiceRequestFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<ServiceRequest>, i64)>;
    async fn count(&self, filter: &ServiceRequestFilter) -> StoreResult<i64>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> StoreResult<()>;
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Message>>;
    async fn delete(&self, id: &str) -> StoreResult<bool>;
    /// Newest first. `None` means every project.
    async fn list(
        &self,
        project_ids: Option<&[String]>,
        page: PageRequest,
    ) -> StoreResult<(Vec<Message>, i64)>;
}

#[async_trait]
pub trait ServiceTypeRepository: Send + Sync {
    async fn create(&self, service_type: &ServiceType) -> StoreResult<()>;
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ServiceType>>;
    async fn update(&self, service_type: &ServiceType) -> StoreResult<bool>;
    async fn delete(&self, id: &str) -> StoreResult<bool>;
    async fn list(&self, status: Option<ServiceTypeStatus>) -> StoreResult<Vec<ServiceType>>;
}

