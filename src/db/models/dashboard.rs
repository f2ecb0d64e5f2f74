use serde::Serialize;
use utoipa::ToSchema;

/// Counts behind the dashboard, scoped to what the caller may see.
#[derive(Debug, Default, Serialize, ToSchema, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_projects: i64,
    pub pending_projects: i64,
    pub active_projects: i64,
    pub in_progress_projects: i64,
    pub completed_projects: i64,
    pub pending_service_requests: i64,
    /// Admins only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<i64>,
    /// Admins only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clients: Option<i64>,
}
