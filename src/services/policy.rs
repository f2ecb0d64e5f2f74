//! Role-based access rules.
//!
//! Every rule is a pure function over the calling [`Actor`] and an already
//! loaded resource. Callers load first (absent → `NotFound`) and only then ask
//! the policy, so a denial always means the resource exists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::message::Message;
use crate::db::models::project::{Project, ProjectFilter, UpdateProject};
use crate::db::models::service_request::{ServiceRequest, ServiceRequestFilter};
use crate::db::models::user::{Role, UpdateUser, User};
use crate::error::AppError;

/// The authenticated caller, as seen by every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id.clone(), user.role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Denied(pub &'static str);

impl From<Denied> for AppError {
    fn from(denied: Denied) -> Self {
        AppError::Forbidden(denied.0.to_string())
    }
}

pub type Decision = Result<(), Denied>;

pub const ADMIN_ONLY: &str = "admin access required";
pub const EMPLOYEE_NOT_ASSIGNED: &str = "employee not assigned to this project";
pub const EMPLOYEE_PROJECT_FIELDS: &str = "employees can only update project status and progress";
pub const CLIENT_NOT_OWNER: &str = "client can only access their own projects";
pub const CLIENT_PROJECT_STATUS: &str = "clients cannot update project status";
pub const CLIENT_PROJECT_FIELDS: &str = "clients can only update project description and progress";
pub const OWN_MESSAGES_ONLY: &str = "can only delete own messages";
pub const EMPLOYEE_OWN_PROFILE_VIEW: &str = "employees can only view their own profile";
pub const EMPLOYEE_OWN_PROFILE_UPDATE: &str = "employees can only update their own profile";
pub const CLIENT_OWN_PROFILE_VIEW: &str = "clients can only view their own profile";
pub const CLIENT_OWN_PROFILE_UPDATE: &str = "clients can only update their own profile";
pub const EMPLOYEE_PROFILE_FIELDS: &str = "employees cannot modify role, department, or salary";
pub const CLIENT_PROFILE_FIELDS: &str = "clients cannot modify role or company";
pub const ACCOUNT_STATUS: &str = "only admins can change account status";
pub const CLIENTS_CREATE_REQUESTS: &str = "only clients can create service requests";
pub const CLIENT_OWN_REQUESTS: &str = "client can only access their own service requests";
pub const CLIENT_UPDATE_REQUESTS: &str = "clients cannot update service requests";

pub fn admin_only(actor: &Actor) -> Decision {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Denied(ADMIN_ONLY))
    }
}

/// Read access to a project. Also gates posting and reading its messages and
/// updating its progress.
pub fn view_project(actor: &Actor, project: &Project) -> Decision {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Employee if project.has_employee(&actor.id) => Ok(()),
        Role::Employee => Err(Denied(EMPLOYEE_NOT_ASSIGNED)),
        Role::Client if project.client_id == actor.id => Ok(()),
        Role::Client => Err(Denied(CLIENT_NOT_OWNER)),
    }
}

pub fn update_project(actor: &Actor, project: &Project, patch: &UpdateProject) -> Decision {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Employee => {
            view_project(actor, project)?;
            if patch.touches_details() {
                return Err(Denied(EMPLOYEE_PROJECT_FIELDS));
            }
            Ok(())
        }
        Role::Client => {
            // Status is refused before ownership is even looked at.
            if patch.status.is_some() {
                return Err(Denied(CLIENT_PROJECT_STATUS));
            }
            view_project(actor, project)?;
            if patch.name.is_some() {
                return Err(Denied(CLIENT_PROJECT_FIELDS));
            }
            Ok(())
        }
    }
}

pub fn delete_message(actor: &Actor, message: &Message, project: Option<&Project>) -> Decision {
    if actor.is_admin() {
        return Ok(());
    }
    if let Some(project) = project {
        view_project(actor, project)?;
    }
    if message.sender_id != actor.id {
        return Err(Denied(OWN_MESSAGES_ONLY));
    }
    Ok(())
}

pub fn view_user(actor: &Actor, user: &User) -> Decision {
    match actor.role {
        Role::Admin => Ok(()),
        _ if actor.id == user.id => Ok(()),
        Role::Employee => Err(Denied(EMPLOYEE_OWN_PROFILE_VIEW)),
        Role::Client => Err(Denied(CLIENT_OWN_PROFILE_VIEW)),
    }
}

pub fn update_user(actor: &Actor, user: &User, patch: &UpdateUser) -> Decision {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Employee => {
            if actor.id != user.id {
                return Err(Denied(EMPLOYEE_OWN_PROFILE_UPDATE));
            }
            if patch.role.is_some() || patch.department.is_some() || patch.salary.is_some() {
                return Err(Denied(EMPLOYEE_PROFILE_FIELDS));
            }
            self_service_fields(patch)
        }
        Role::Client => {
            if actor.id != user.id {
                return Err(Denied(CLIENT_OWN_PROFILE_UPDATE));
            }
            if patch.role.is_some() || patch.company.is_some() {
                return Err(Denied(CLIENT_PROFILE_FIELDS));
            }
            self_service_fields(patch)
        }
    }
}

fn self_service_fields(patch: &UpdateUser) -> Decision {
    if patch.status.is_some() {
        return Err(Denied(ACCOUNT_STATUS));
    }
    Ok(())
}

pub fn create_service_request(actor: &Actor) -> Decision {
    match actor.role {
        Role::Client => Ok(()),
        Role::Admin | Role::Employee => Err(Denied(CLIENTS_CREATE_REQUESTS)),
    }
}

pub fn view_service_request(actor: &Actor, request: &ServiceRequest) -> Decision {
    match actor.role {
        Role::Admin | Role::Employee => Ok(()),
        Role::Client if request.client_id == actor.id => Ok(()),
        Role::Client => Err(Denied(CLIENT_OWN_REQUESTS)),
    }
}

pub fn update_service_request(actor: &Actor) -> Decision {
    match actor.role {
        Role::Admin | Role::Employee => Ok(()),
        Role::Client => Err(Denied(CLIENT_UPDATE_REQUESTS)),
    }
}

/// Narrows a project listing to what `actor` may see.
pub fn scope_projects(actor: &Actor, filter: &mut ProjectFilter) {
    match actor.role {
        Role::Admin => {}
        Role::Employee => {
            filter.employee_id = Some(actor.id.clone());
            filter.client_id = None;
        }
        Role::Client => {
            filter.client_id = Some(actor.id.clone());
            filter.employee_id = None;
        }
    }
}

pub fn scope_service_requests(actor: &Actor, filter: &mut ServiceRequestFilter) {
    if actor.role == Role::Client {
        filter.client_id = Some(actor.id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::project::ProjectStatus;
    use crate::db::models::service_request::RequestStatus;
    use chrono::Utc;

    fn admin() -> Actor {
        Actor::new("USER01", Role::Admin)
    }

    fn employee(id: &str) -> Actor {
        Actor::new(id, Role::Employee)
    }

    fn client(id: &str) -> Actor {
        Actor::new(id, Role::Client)
    }

    fn project(client_id: &str, employees: &[&str]) -> Project {
        Project {
            id: "PROJECT02".into(),
            name: "Website".into(),
            description: "Marketing site".into(),
            client_id: client_id.into(),
            status: ProjectStatus::Active,
            progress: 10,
            employee_ids: employees.iter().map(|e| e.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn status_patch() -> UpdateProject {
        UpdateProject { status: Some(ProjectStatus::Completed), ..Default::default() }
    }

    #[test]
    fn unassigned_employee_cannot_touch_project() {
        let p = project("USER02", &["USER03"]);
        let who = employee("USER05");
        assert_eq!(view_project(&who, &p), Err(Denied(EMPLOYEE_NOT_ASSIGNED)));
        assert_eq!(update_project(&who, &p, &status_patch()), Err(Denied(EMPLOYEE_NOT_ASSIGNED)));
    }

    #[test]
    fn assigned_employee_limited_to_status_and_progress() {
        let p = project("USER02", &["USER05"]);
        let who = employee("USER05");
        assert!(update_project(&who, &p, &status_patch()).is_ok());
        let progress = UpdateProject { progress: Some(80), ..Default::default() };
        assert!(update_project(&who, &p, &progress).is_ok());

        let rename = UpdateProject { name: Some("New".into()), ..Default::default() };
        assert_eq!(update_project(&who, &p, &rename), Err(Denied(EMPLOYEE_PROJECT_FIELDS)));
        let describe = UpdateProject { description: Some("x".into()), ..Default::default() };
        assert_eq!(update_project(&who, &p, &describe), Err(Denied(EMPLOYEE_PROJECT_FIELDS)));
    }

    #[test]
    fn client_status_patch_denied_even_when_owner() {
        let owned = project("USER02", &[]);
        let foreign = project("USER09", &[]);
        let who = client("USER02");
        assert_eq!(update_project(&who, &owned, &status_patch()), Err(Denied(CLIENT_PROJECT_STATUS)));
        assert_eq!(update_project(&who, &foreign, &status_patch()), Err(Denied(CLIENT_PROJECT_STATUS)));
    }

    #[test]
    fn client_may_edit_description_and_progress_of_own_project() {
        let owned = project("USER02", &[]);
        let who = client("USER02");
        let patch = UpdateProject {
            description: Some("Updated".into()),
            progress: Some(50),
            ..Default::default()
        };
        assert!(update_project(&who, &owned, &patch).is_ok());

        let rename = UpdateProject { name: Some("Mine".into()), ..Default::default() };
        assert_eq!(update_project(&who, &owned, &rename), Err(Denied(CLIENT_PROJECT_FIELDS)));

        let foreign = project("USER09", &[]);
        assert_eq!(update_project(&who, &foreign, &patch), Err(Denied(CLIENT_NOT_OWNER)));
    }

    #[test]
    fn admin_is_unrestricted() {
        let p = project("USER09", &[]);
        let everything = UpdateProject {
            name: Some("n".into()),
            description: Some("d".into()),
            status: Some(ProjectStatus::Rejected),
            progress: Some(0),
        };
        assert!(view_project(&admin(), &p).is_ok());
        assert!(update_project(&admin(), &p, &everything).is_ok());
        assert!(admin_only(&admin()).is_ok());
        assert_eq!(admin_only(&employee("USER05")), Err(Denied(ADMIN_ONLY)));
        assert_eq!(admin_only(&client("USER02")), Err(Denied(ADMIN_ONLY)));
    }

    fn message(sender: &str) -> Message {
        Message {
            id: "MESSAGE01".into(),
            content: "hi".into(),
            sender_id: sender.into(),
            project_id: "PROJECT02".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn messages_deleted_only_by_sender_within_visible_project() {
        let p = project("USER02", &["USER05"]);
        assert!(delete_message(&employee("USER05"), &message("USER05"), Some(&p)).is_ok());
        assert_eq!(
            delete_message(&employee("USER05"), &message("USER02"), Some(&p)),
            Err(Denied(OWN_MESSAGES_ONLY))
        );
        assert_eq!(
            delete_message(&employee("USER06"), &message("USER06"), Some(&p)),
            Err(Denied(EMPLOYEE_NOT_ASSIGNED))
        );
        assert!(delete_message(&admin(), &message("USER02"), None).is_ok());
    }

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.into(),
            email: format!("{}@example.com", id.to_lowercase()),
            password_hash: String::new(),
            name: id.into(),
            phone: None,
            role,
            status: Default::default(),
            department: None,
            salary: None,
            company: None,
            address: None,
            hide: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn profiles_are_self_service() {
        let me = user("USER05", Role::Employee);
        let other = user("USER06", Role::Employee);
        let who = employee("USER05");
        assert!(view_user(&who, &me).is_ok());
        assert_eq!(view_user(&who, &other), Err(Denied(EMPLOYEE_OWN_PROFILE_VIEW)));

        let phone = UpdateUser { phone: Some("555".into()), ..Default::default() };
        assert!(update_user(&who, &me, &phone).is_ok());
        assert_eq!(update_user(&who, &other, &phone), Err(Denied(EMPLOYEE_OWN_PROFILE_UPDATE)));

        let raise = UpdateUser { salary: Some(0), ..Default::default() };
        assert_eq!(update_user(&who, &me, &raise), Err(Denied(EMPLOYEE_PROFILE_FIELDS)));
    }

    #[test]
    fn clients_cannot_change_role_or_company() {
        let me = user("USER02", Role::Client);
        let who = client("USER02");
        let promote = UpdateUser { role: Some(Role::Admin), ..Default::default() };
        assert_eq!(update_user(&who, &me, &promote), Err(Denied(CLIENT_PROFILE_FIELDS)));
        let rebrand = UpdateUser { company: Some("Other".into()), ..Default::default() };
        assert_eq!(update_user(&who, &me, &rebrand), Err(Denied(CLIENT_PROFILE_FIELDS)));
        let address = UpdateUser { address: Some("1 Main St".into()), ..Default::default() };
        assert!(update_user(&who, &me, &address).is_ok());
        let deactivate = UpdateUser { status: Some(Default::default()), ..Default::default() };
        assert_eq!(update_user(&who, &me, &deactivate), Err(Denied(ACCOUNT_STATUS)));
    }

    #[test]
    fn only_clients_open_service_requests() {
        assert!(create_service_request(&client("USER02")).is_ok());
        assert_eq!(create_service_request(&admin()), Err(Denied(CLIENTS_CREATE_REQUESTS)));
        assert_eq!(create_service_request(&employee("USER05")), Err(Denied(CLIENTS_CREATE_REQUESTS)));

        let request = ServiceRequest {
            id: "SERVICE01".into(),
            title: "App".into(),
            description: String::new(),
            client_id: "USER02".into(),
            project_id: None,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(view_service_request(&employee("USER05"), &request).is_ok());
        assert!(view_service_request(&client("USER02"), &request).is_ok());
        assert_eq!(view_service_request(&client("USER03"), &request), Err(Denied(CLIENT_OWN_REQUESTS)));
        assert_eq!(update_service_request(&client("USER02")), Err(Denied(CLIENT_UPDATE_REQUESTS)));
    }

    #[test]
    fn listings_are_scoped_by_role() {
        let mut filter = ProjectFilter { client_id: Some("USER09".into()), ..Default::default() };
        scope_projects(&employee("USER05"), &mut filter);
        assert_eq!(filter.employee_id.as_deref(), Some("USER05"));
        assert_eq!(filter.client_id, None);

        let mut filter = ProjectFilter::default();
        scope_projects(&client("USER02"), &mut filter);
        assert_eq!(filter.client_id.as_deref(), Some("USER02"));

        let mut filter = ProjectFilter { client_id: Some("USER09".into()), ..Default::default() };
        scope_projects(&admin(), &mut filter);
        assert_eq!(filter.client_id.as_deref(), Some("USER09"));

        let mut requests = ServiceRequestFilter::default();
        scope_service_requests(&employee("USER05"), &mut requests);
        assert_eq!(requests.client_id, None);
        scope_service_requests(&client("USER02"), &mut requests);
        assert_eq!(requests.client_id.as_deref(), Some("USER02"));
    }

    #[test]
    fn denial_becomes_forbidden() {
        let err: AppError = Denied(EMPLOYEE_NOT_ASSIGNED).into();
        assert_eq!(err.kind(), crate::error::ErrorKind::Forbidden);
    }
}
