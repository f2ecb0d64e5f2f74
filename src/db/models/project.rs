use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Pending,
    Active,
    InProgress,
    Completed,
    Rejected,
}

#[derive(Serialize, Deserialize, Debug, Clone, FromRow, ToSchema)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub client_id: String,
    pub status: ProjectStatus,
    pub progress: i32,
    pub employee_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn has_employee(&self, user_id: &str) -> bool {
        self.employee_ids.iter().any(|id| id == user_id)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub client_id: String,
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub employee_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i32>,
}

impl UpdateProject {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none() && self.progress.is_none()
    }

    /// True when the patch touches anything besides status and progress.
    pub fn touches_details(&self) -> bool {
        self.name.is_some() || self.description.is_some()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignEmployees {
    pub employee_ids: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProgress {
    pub progress: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProjectListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Matches id, name or description, case-insensitively
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    /// Only honoured for admins
    pub client_id: Option<String>,
}

/// Storage-level filter. Role scoping is folded in by the service before the
/// filter reaches a repository.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub client_id: Option<String>,
    pub employee_id: Option<String>,
}
