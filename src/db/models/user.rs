use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Serialize, Deserialize, Debug, Clone, FromRow, ToSchema)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub department: Option<String>,
    pub salary: Option<i64>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub hide: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Fields of a user that are written on creation. The id and timestamps are
/// filled in by the service.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub department: Option<String>,
    pub salary: Option<i64>,
    pub company: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployee {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub salary: i64,
    pub password: String,
    #[serde(default)]
    pub status: UserStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: String,
    pub address: String,
    pub password: String,
    #[serde(default)]
    pub status: UserStatus,
}

/// Partial update of a user. A `None` field is left untouched, so `0`, `""`
/// and `false` are all valid values to write.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub salary: Option<i64>,
    pub password: Option<String>, // Raw password, will be hashed
    pub status: Option<UserStatus>,
    pub hide: Option<bool>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.role.is_none()
            && self.department.is_none()
            && self.company.is_none()
            && self.address.is_none()
            && self.salary.is_none()
            && self.password.is_none()
            && self.status.is_none()
            && self.hide.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UserListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Ignored on the `/employees` and `/clients` listings
    pub role: Option<Role>,
    /// Matches name, email or company, case-insensitively
    pub search: Option<String>,
}
