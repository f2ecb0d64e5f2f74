use async_trait::async_trait;

use super::PgStore;
use crate::db::models::service_type::{ServiceType, ServiceTypeStatus};
use crate::db::repository::{ServiceTypeRepository, StoreResult};
use crate::db::timed;

#[async_trait]
impl ServiceTypeRepository for PgStore {
    async fn create(&self, service_type: &ServiceType) -> StoreResult<()> {
        timed(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO service_types (id, name, description, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&service_type.id)
            .bind(&service_type.name)
            .bind(&service_type.description)
            .bind(service_type.status)
            .bind(service_type.created_at)
            .bind(service_type.updated_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ServiceType>> {
        timed(
            self.timeout,
            sqlx::query_as::<_, ServiceType>("SELECT * FROM service_types WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn update(&self, service_type: &ServiceType) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query(
                r#"
                UPDATE service_types
                SET name = $2, description = $3, status = $4, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(&service_type.id)
            .bind(&service_type.name)
            .bind(&service_type.description)
            .bind(service_type.status)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM service_types WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, status: Option<ServiceTypeStatus>) -> StoreResult<Vec<ServiceType>> {
        let query = match status {
            Some(status) => sqlx::query_as::<_, ServiceType>(
                "SELECT * FROM service_types WHERE status = $1 ORDER BY name",
            )
            .bind(status),
            None => sqlx::query_as::<_, ServiceType>("SELECT * FROM service_types ORDER BY name"),
        };
        timed(self.timeout, query.fetch_all(&self.pool)).await
    }
}
