use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::db::Repositories;
use crate::middleware::auth::{create_actor_cache, ActorCache};
use crate::services::Services;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub services: Services,
    pub actor_cache: ActorCache,
    /// `None` when running on the in-process store.
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories, pool: Option<PgPool>) -> Self {
        Self {
            services: Services::new(repos, &config),
            actor_cache: create_actor_cache(config.actor_cache_ttl),
            config: Arc::new(config),
            pool,
        }
    }
}
