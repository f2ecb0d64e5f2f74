//! In-process store used when no `DATABASE_URL` is configured and by the
//! test-suite. Collections keep insertion order; lists that the PostgreSQL
//! store returns newest-first are walked in reverse here.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};

use crate::db::error::StoreError;
use crate::db::models::message::Message;
use crate::db::models::pagination::PageRequest;
use crate::db::models::project::{Project, ProjectFilter};
use crate::db::models::service_request::{RequestStatus, ServiceRequest, ServiceRequestFilter};
use crate::db::models::service_type::{ServiceType, ServiceTypeStatus};
use crate::db::models::user::{User, UserFilter};
use crate::db::repository::{
    CounterRepository, MessageRepository, ProjectRepository, ServiceRequestRepository,
    ServiceTypeRepository, StoreResult, UserRepository,
};

#[derive(Default)]
pub struct MemoryStore {
    counters: Mutex<HashMap<String, i64>>,
    users: RwLock<Vec<User>>,
    projects: RwLock<Vec<Project>>,
    requests: RwLock<Vec<ServiceRequest>>,
    messages: RwLock<Vec<Message>>,
    service_types: RwLock<Vec<ServiceType>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page_of<T>(matching: Vec<T>, page: PageRequest) -> (Vec<T>, i64) {
    let total = matching.len() as i64;
    let items = matching
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    (items, total)
}

fn user_matches(user: &User, filter: &UserFilter) -> bool {
    if filter.role.is_some_and(|role| role != user.role) {
        return false;
    }
    match filter.search.as_deref() {
        Some(term) => {
            contains_ci(&user.name, term)
                || contains_ci(&user.email, term)
                || user.company.as_deref().is_some_and(|c| contains_ci(c, term))
        }
        None => true,
    }
}

fn project_matches(project: &Project, filter: &ProjectFilter) -> bool {
    if filter.status.is_some_and(|s| s != project.status) {
        return false;
    }
    if filter.client_id.as_deref().is_some_and(|c| c != project.client_id) {
        return false;
    }
    if filter.employee_id.as_deref().is_some_and(|e| !project.has_employee(e)) {
        return false;
    }
    match filter.search.as_deref() {
        Some(term) => {
            contains_ci(&project.id, term)
                || contains_ci(&project.name, term)
                || contains_ci(&project.description, term)
        }
        None => true,
    }
}

fn request_matches(request: &ServiceRequest, filter: &ServiceRequestFilter) -> bool {
    if filter.status.is_some_and(|s| s != request.status) {
        return false;
    }
    if filter.client_id.as_deref().is_some_and(|c| c != request.client_id) {
        return false;
    }
    match filter.search.as_deref() {
        Some(term) => {
            contains_ci(&request.id, term)
                || contains_ci(&request.title, term)
                || contains_ci(&request.description, term)
        }
        None => true,
    }
}

#[async_trait]
impl CounterRepository for MemoryStore {
    async fn next_sequence(&self, name: &str) -> StoreResult<i64> {
        let mut counters = self.counters.lock().await;
        let value = counters.entry(name.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Duplicate("users_pkey".into()));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("users_email_key".into()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: &User) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email && u.id != user.id) {
            return Err(StoreError::Duplicate("users_email_key".into()));
        }
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = User { created_at: existing.created_at, updated_at: Utc::now(), ..user.clone() };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> StoreResult<(Vec<User>, i64)> {
        let users = self.users.read().await;
        let matching = users.iter().filter(|u| user_matches(u, filter)).cloned().collect();
        Ok(page_of(matching, page))
    }

    async fn count(&self, filter: &UserFilter) -> StoreResult<i64> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| user_matches(u, filter)).count() as i64)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn create(&self, project: &Project) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        if projects.iter().any(|p| p.id == project.id) {
            return Err(StoreError::Duplicate("projects_pkey".into()));
        }
        projects.push(project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Project>> {
        Ok(self.projects.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, project: &Project) -> StoreResult<bool> {
        let mut projects = self.projects.write().await;
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                existing.name = project.name.clone();
                existing.description = project.description.clone();
                existing.status = project.status;
                existing.progress = project.progress;
                existing.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn assign_employees(&self, id: &str, employee_ids: &[String]) -> StoreResult<bool> {
        let mut projects = self.projects.write().await;
        match projects.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                existing.employee_ids = employee_ids.to_vec();
                existing.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() != before)
    }

    async fn list(&self, filter: &ProjectFilter, page: PageRequest) -> StoreResult<(Vec<Project>, i64)> {
        let projects = self.projects.read().await;
        let matching = projects
            .iter()
            .rev()
            .filter(|p| project_matches(p, filter))
            .cloned()
            .collect();
        Ok(page_of(matching, page))
    }

    async fn count(&self, filter: &ProjectFilter) -> StoreResult<i64> {
        let projects = self.projects.read().await;
        Ok(projects.iter().filter(|p| project_matches(p, filter)).count() as i64)
    }

    async fn ids(&self, filter: &ProjectFilter) -> StoreResult<Vec<String>> {
        let projects = self.projects.read().await;
        Ok(projects
            .iter()
            .filter(|p| project_matches(p, filter))
            .map(|p| p.id.clone())
            .collect())
    }
}

#[async_trait]
impl ServiceRequestRepository for MemoryStore {
    async fn create(&self, request: &ServiceRequest) -> StoreResult<()> {
        let mut requests = self.requests.write().await;
        if requests.iter().any(|r| r.id == request.id) {
            return Err(StoreError::Duplicate("service_requests_pkey".into()));
        }
        requests.push(request.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ServiceRequest>> {
        Ok(self.requests.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn update(&self, request: &ServiceRequest) -> StoreResult<bool> {
        let mut requests = self.requests.write().await;
        match requests.iter_mut().find(|r| r.id == request.id) {
            Some(existing) => {
                existing.title = request.title.clone();
                existing.description = request.description.clone();
                existing.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn transition(
        &self,
        id: &str,
        from: RequestStatus,
        to: RequestStatus,
        project_id: Option<&str>,
    ) -> StoreResult<bool> {
        let mut requests = self.requests.write().await;
        match requests.iter_mut().find(|r| r.id == id && r.status == from) {
            Some(existing) => {
                existing.status = to;
                if let Some(project_id) = project_id {
                    existing.project_id = Some(project_id.to_string());
                }
                existing.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|r| r.id != id);
        Ok(requests.len() != before)
    }

    async fn list(
        &self,
        filter: &ServiceRequestFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<ServiceRequest>, i64)> {
        let requests = self.requests.read().await;
        let matching = requests
            .iter()
            .rev()
            .filter(|r| request_matches(r, filter))
            .cloned()
            .collect();
        Ok(page_of(matching, page))
    }

    async fn count(&self, filter: &ServiceRequestFilter) -> StoreResult<i64> {
        let requests = self.requests.read().await;
        Ok(requests.iter().filter(|r| request_matches(r, filter)).count() as i64)
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create(&self, message: &Message) -> StoreResult<()> {
        let mut messages = self.messages.write().await;
        if messages.iter().any(|m| m.id == message.id) {
            return Err(StoreError::Duplicate("messages_pkey".into()));
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Message>> {
        Ok(self.messages.read().await.iter().find(|m| m.id == id).cloned())
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        Ok(messages.len() != before)
    }

    async fn list(
        &self,
        project_ids: Option<&[String]>,
        page: PageRequest,
    ) -> StoreResult<(Vec<Message>, i64)> {
        let messages = self.messages.read().await;
        let matching = messages
            .iter()
            .rev()
            .filter(|m| project_ids.is_none_or(|ids| ids.contains(&m.project_id)))
            .cloned()
            .collect();
        Ok(page_of(matching, page))
    }
}

#[async_trait]
impl ServiceTypeRepository for MemoryStore {
    async fn create(&self, service_type: &ServiceType) -> StoreResult<()> {
        self.service_types.write().await.push(service_type.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ServiceType>> {
        Ok(self.service_types.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn update(&self, service_type: &ServiceType) -> StoreResult<bool> {
        let mut types = self.service_types.write().await;
        match types.iter_mut().find(|t| t.id == service_type.id) {
            Some(existing) => {
                existing.name = service_type.name.clone();
                existing.description = service_type.description.clone();
                existing.status = service_type.status;
                existing.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut types = self.service_types.write().await;
        let before = types.len();
        types.retain(|t| t.id != id);
        Ok(types.len() != before)
    }

    async fn list(&self, status: Option<ServiceTypeStatus>) -> StoreResult<Vec<ServiceType>> {
        let types = self.service_types.read().await;
        Ok(types
            .iter()
            .filter(|t| status.is_none_or(|s| s == t.status))
            .cloned()
            .collect())
    }
}
