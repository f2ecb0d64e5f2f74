use chrono::Utc;
use tracing::info;

use super::policy::{self, Actor};
use super::mint_id;
use crate::db::error::StoreError;
use crate::db::models::counter::Sequence;
use crate::db::models::dashboard::DashboardStats;
use crate::db::models::pagination::{Page, PageRequest};
use crate::db::models::project::{ProjectFilter, ProjectStatus};
use crate::db::models::service_request::{RequestStatus, ServiceRequestFilter};
use crate::db::models::user::{
    CreateClient, CreateEmployee, NewUser, Role, UpdateUser, User, UserFilter, UserListParams,
};
use crate::db::Repositories;
use crate::error::{AppError, StoreContext};
use crate::utils::password::{hash_password, validate_password};
use crate::utils::validate;

#[derive(Clone)]
pub struct UserService {
    repos: Repositories,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repos: Repositories, bcrypt_cost: u32) -> Self {
        Self { repos, bcrypt_cost }
    }

    /// Validates and stores a new account of `role`. Email uniqueness is
    /// checked before an id is minted or the password hashed.
    pub(crate) async fn insert(&self, role: Role, new: NewUser) -> Result<User, AppError> {
        let name = validate::required("name", &new.name)?;
        let email = validate::email(&new.email)?;
        validate_password(&new.password)?;
        if new.salary.is_some_and(|s| s < 0) {
            return Err(AppError::Validation("salary must not be negative".into()));
        }

        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("email already exists".into()));
        }

        let password_hash = hash_password(&new.password, self.bcrypt_cost)?;
        let id = mint_id(self.repos.counters.as_ref(), Sequence::User).await?;
        let now = Utc::now();
        let user = User {
            id,
            email,
            password_hash,
            name,
            phone: validate::optional(new.phone),
            role,
            status: new.status,
            department: validate::optional(new.department),
            salary: new.salary,
            company: validate::optional(new.company),
            address: validate::optional(new.address),
            hide: false,
            created_at: now,
            updated_at: now,
        };

        match self.repos.users.create(&user).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                return Err(AppError::Conflict("email already exists".into()))
            }
            Err(e) => return Err(AppError::Storage { context: "failed to create user".into(), source: e }),
        }
        info!("Created {} account {}", user.role, user.id);
        Ok(user)
    }

    pub(crate) async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.repos.users.find_by_email(email).await.context("failed to look up user")
    }

    /// Loads a user without any policy check. Used to resolve the caller.
    pub async fn find(&self, id: &str) -> Result<Option<User>, AppError> {
        self.repos.users.find_by_id(id).await.context("failed to load user")
    }

    pub(crate) async fn any_users(&self) -> Result<bool, AppError> {
        let total = self
            .repos
            .users
            .count(&UserFilter::default())
            .await
            .context("failed to count users")?;
        Ok(total > 0)
    }

    /// `kind` restricts the lookup to one role, so `/employees/USER02` is a
    /// 404 when USER02 is a client.
    async fn load(&self, id: &str, kind: Option<Role>) -> Result<User, AppError> {
        let what = kind.map_or("user", |role| match role {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Client => "client",
        });
        match self.find(id).await? {
            Some(user) if kind.is_none_or(|role| role == user.role) => Ok(user),
            _ => Err(AppError::not_found(what)),
        }
    }

    pub async fn get(&self, actor: &Actor, id: &str, kind: Option<Role>) -> Result<User, AppError> {
        if kind.is_some() {
            policy::admin_only(actor)?;
        }
        let user = self.load(id, kind).await?;
        policy::view_user(actor, &user)?;
        Ok(user)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        kind: Option<Role>,
        patch: UpdateUser,
    ) -> Result<User, AppError> {
        if kind.is_some() {
            policy::admin_only(actor)?;
        }
        if patch.is_empty() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        let mut user = self.load(id, kind).await?;
        policy::update_user(actor, &user, &patch)?;

        if let Some(name) = patch.name {
            user.name = validate::required("name", &name)?;
        }
        if let Some(email) = patch.email {
            let email = validate::email(&email)?;
            if email != user.email {
                if let Some(existing) = self.find_by_email(&email).await? {
                    if existing.id != user.id {
                        return Err(AppError::Conflict("email already exists".into()));
                    }
                }
                user.email = email;
            }
        }
        if let Some(password) = patch.password {
            validate_password(&password)?;
            user.password_hash = hash_password(&password, self.bcrypt_cost)?;
        }
        if let Some(salary) = patch.salary {
            if salary < 0 {
                return Err(AppError::Validation("salary must not be negative".into()));
            }
            user.salary = Some(salary);
        }
        if patch.phone.is_some() {
            user.phone = validate::optional(patch.phone);
        }
        if patch.department.is_some() {
            user.department = validate::optional(patch.department);
        }
        if patch.company.is_some() {
            user.company = validate::optional(patch.company);
        }
        if patch.address.is_some() {
            user.address = validate::optional(patch.address);
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(status) = patch.status {
            user.status = status;
        }
        if let Some(hide) = patch.hide {
            user.hide = hide;
        }
        user.updated_at = Utc::now();

        match self.repos.users.update(&user).await {
            Ok(true) => Ok(user),
            Ok(false) => Err(AppError::not_found("user")),
            Err(StoreError::Duplicate(_)) => Err(AppError::Conflict("email already exists".into())),
            Err(e) => Err(AppError::Storage { context: "failed to update user".into(), source: e }),
        }
    }

    pub async fn delete(&self, actor: &Actor, id: &str, kind: Option<Role>) -> Result<(), AppError> {
        policy::admin_only(actor)?;
        if actor.id == id {
            return Err(AppError::Validation("admins cannot delete their own account".into()));
        }
        self.load(id, kind).await?;
        let deleted = self.repos.users.delete(id).await.context("failed to delete user")?;
        if !deleted {
            return Err(AppError::not_found("user"));
        }
        info!("Deleted user {id}");
        Ok(())
    }

    /// Admin listing. `kind` pins the role for the `/employees` and
    /// `/clients` surfaces; otherwise the caller's role filter applies.
    pub async fn list(
        &self,
        actor: &Actor,
        params: UserListParams,
        kind: Option<Role>,
    ) -> Result<Page<User>, AppError> {
        policy::admin_only(actor)?;
        let page = PageRequest::new(params.page, params.page_size)?;
        let filter = UserFilter {
            role: kind.or(params.role),
            search: validate::optional(params.search),
        };
        let (users, total) = self.repos.users.list(&filter, page).await.context("failed to list users")?;
        Ok(Page::new(users, total, page))
    }

    pub async fn create_employee(&self, actor: &Actor, payload: CreateEmployee) -> Result<User, AppError> {
        policy::admin_only(actor)?;
        let department = validate::required("department", &payload.department)?;
        self.insert(
            Role::Employee,
            NewUser {
                email: payload.email,
                password: payload.password,
                name: payload.name,
                phone: payload.phone,
                status: payload.status,
                department: Some(department),
                salary: Some(payload.salary),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn create_client(&self, actor: &Actor, payload: CreateClient) -> Result<User, AppError> {
        policy::admin_only(actor)?;
        let company = validate::required("company", &payload.company)?;
        let address = validate::required("address", &payload.address)?;
        self.insert(
            Role::Client,
            NewUser {
                email: payload.email,
                password: payload.password,
                name: payload.name,
                phone: payload.phone,
                status: payload.status,
                company: Some(company),
                address: Some(address),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn dashboard_stats(&self, actor: &Actor) -> Result<DashboardStats, AppError> {
        let project_count = |status: Option<ProjectStatus>| {
            let mut filter = ProjectFilter { status, ..Default::default() };
            policy::scope_projects(actor, &mut filter);
            async move { self.repos.projects.count(&filter).await.context("failed to count projects") }
        };

        let mut requests = ServiceRequestFilter {
            status: Some(RequestStatus::Pending),
            ..Default::default()
        };
        policy::scope_service_requests(actor, &mut requests);

        let mut stats = DashboardStats {
            total_projects: project_count(None).await?,
            pending_projects: project_count(Some(ProjectStatus::Pending)).await?,
            active_projects: project_count(Some(ProjectStatus::Active)).await?,
            in_progress_projects: project_count(Some(ProjectStatus::InProgress)).await?,
            completed_projects: project_count(Some(ProjectStatus::Completed)).await?,
            pending_service_requests: self
                .repos
                .service_requests
                .count(&requests)
                .await
                .context("failed to count service requests")?,
            employees: None,
            clients: None,
        };

        if actor.is_admin() {
            for (role, slot) in [(Role::Employee, &mut stats.employees), (Role::Client, &mut stats.clients)] {
                let filter = UserFilter { role: Some(role), search: None };
                *slot = Some(self.repos.users.count(&filter).await.context("failed to count users")?);
            }
        }
        Ok(stats)
    }
}
