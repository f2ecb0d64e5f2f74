pub mod auth;
pub mod message;
pub mod policy;
pub mod project;
pub mod service_request;
pub mod service_type;
pub mod user;

use crate::config::Config;
use crate::db::models::counter::Sequence;
use crate::db::repository::CounterRepository;
use crate::db::Repositories;
use crate::error::{AppError, StoreContext};

pub use policy::Actor;

/// Every service the HTTP layer talks to, wired over one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: user::UserService,
    pub projects: project::ProjectService,
    pub service_requests: service_request::ServiceRequestService,
    pub messages: message::MessageService,
    pub service_types: service_type::ServiceTypeService,
}

impl Services {
    pub fn new(repos: Repositories, config: &Config) -> Self {
        let users = user::UserService::new(repos.clone(), config.bcrypt_cost);
        Self {
            auth: auth::AuthService::new(users.clone(), config),
            users,
            projects: project::ProjectService::new(repos.clone()),
            service_requests: service_request::ServiceRequestService::new(repos.clone()),
            messages: message::MessageService::new(repos.clone()),
            service_types: service_type::ServiceTypeService::new(repos),
        }
    }
}

/// Mints the next display id for `sequence`, e.g. `PROJECT07`.
pub(crate) async fn mint_id(
    counters: &dyn CounterRepository,
    sequence: Sequence,
) -> Result<String, AppError> {
    let value = counters
        .next_sequence(sequence.counter_name())
        .await
        .context("failed to generate id")?;
    Ok(sequence.format_id(value))
}
