use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    #[serde(alias = "approved")]
    Active,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, FromRow, ToSchema)]
pub struct ServiceRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub client_id: String,
    pub project_id: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewServiceRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateServiceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ApproveServiceRequest {
    #[serde(default)]
    pub employee_ids: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ServiceRequestListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Matches id, title or description, case-insensitively
    pub search: Option<String>,
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceRequestFilter {
    pub search: Option<String>,
    pub status: Option<RequestStatus>,
    pub client_id: Option<String>,
}
