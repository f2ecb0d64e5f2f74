pub mod error;
pub mod memory;
pub mod models;
pub mod pool;
pub mod queries;
pub mod repository;

use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::db::error::StoreError;
use crate::db::memory::MemoryStore;
use crate::db::queries::PgStore;
use crate::db::repository::{
    CounterRepository, MessageRepository, ProjectRepository, ServiceRequestRepository,
    ServiceTypeRepository, StoreResult, UserRepository,
};

/// Every repository the services need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub counters: Arc<dyn CounterRepository>,
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub service_requests: Arc<dyn ServiceRequestRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub service_types: Arc<dyn ServiceTypeRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool, timeout: Duration) -> Self {
        let store = Arc::new(PgStore::new(pool, timeout));
        Self::from_store(store)
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CounterRepository
            + UserRepository
            + ProjectRepository
            + ServiceRequestRepository
            + MessageRepository
            + ServiceTypeRepository
            + 'static,
    {
        Self {
            counters: store.clone(),
            users: store.clone(),
            projects: store.clone(),
            service_requests: store.clone(),
            messages: store.clone(),
            service_types: store,
        }
    }
}

/// Runs a single storage call under `limit`. A timeout is reported to the
/// caller as-is, it is never retried here.
pub(crate) async fn timed<T, F>(limit: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(StoreError::from_sqlx),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}
