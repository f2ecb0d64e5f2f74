use async_trait::async_trait;

use super::PgStore;
use crate::db::repository::{CounterRepository, StoreResult};
use crate::db::timed;

#[async_trait]
impl CounterRepository for PgStore {
    /// A single upsert: concurrent callers serialise on the row lock, so every
    /// caller sees a distinct value.
    async fn next_sequence(&self, name: &str) -> StoreResult<i64> {
        timed(
            self.timeout,
            sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO counters (name, sequence) VALUES ($1, 1)
                ON CONFLICT (name) DO UPDATE SET sequence = counters.sequence + 1
                RETURNING sequence
                "#,
            )
            .bind(name)
            .fetch_one(&self.pool),
        )
        .await
    }
}
