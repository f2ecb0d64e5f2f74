use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "service_type_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ServiceTypeStatus {
    Active,
    Inactive,
}

#[derive(Debug, Serialize, Deserialize, Clone, FromRow, ToSchema)]
pub struct ServiceType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: ServiceTypeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewServiceType {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ServiceTypeStatus,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateServiceType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ServiceTypeStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ServiceTypeListParams {
    pub status: Option<ServiceTypeStatus>,
}
