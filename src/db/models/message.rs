use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, Clone, FromRow, ToSchema)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender_id: String,
    pub project_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewMessage {
    pub content: String,
    pub project_id: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MessageListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub project_id: Option<String>,
}
