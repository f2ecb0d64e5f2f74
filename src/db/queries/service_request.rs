use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::{like_pattern, PgStore, LIKE_ESCAPE};
use crate::db::models::pagination::PageRequest;
use crate::db::models::service_request::{RequestStatus, ServiceRequest, ServiceRequestFilter};
use crate::db::repository::{ServiceRequestRepository, StoreResult};
use crate::db::timed;

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ServiceRequestFilter) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(client_id) = &filter.client_id {
        qb.push(" AND client_id = ").push_bind(client_id.clone());
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern = like_pattern(term);
        qb.push(" AND (id ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR title ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(LIKE_ESCAPE)
            .push(")");
    }
}

#[async_trait]
impl ServiceRequestRepository for PgStore {
    async fn create(&self, request: &ServiceRequest) -> StoreResult<()> {
        timed(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO service_requests (id, title, description, client_id, project_id, status,
                                              created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(&request.id)
            .bind(&request.title)
            .bind(&request.description)
            .bind(&request.client_id)
            .bind(&request.project_id)
            .bind(request.status)
            .bind(request.created_at)
            .bind(request.updated_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ServiceRequest>> {
        timed(
            self.timeout,
            sqlx::query_as::<_, ServiceRequest>("SELECT * FROM service_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn update(&self, request: &ServiceRequest) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query(
                "UPDATE service_requests SET title = $2, description = $3, updated_at = NOW() WHERE id = $1",
            )
            .bind(&request.id)
            .bind(&request.title)
            .bind(&request.description)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn transition(
        &self,
        id: &str,
        from: RequestStatus,
        to: RequestStatus,
        project_id: Option<&str>,
    ) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query(
                r#"
                UPDATE service_requests
                SET status = $3, project_id = COALESCE($4, project_id), updated_at = NOW()
                WHERE id = $1 AND status = $2
                "#,
            )
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(project_id)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM service_requests WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &ServiceRequestFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<ServiceRequest>, i64)> {
        let total = self.count(filter).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM service_requests");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let requests = timed(
            self.timeout,
            qb.build_query_as::<ServiceRequest>().fetch_all(&self.pool),
        )
        .await?;
        Ok((requests, total))
    }

    async fn count(&self, filter: &ServiceRequestFilter) -> StoreResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM service_requests");
        push_filter(&mut qb, filter);
        timed(self.timeout, qb.build_query_scalar::<i64>().fetch_one(&self.pool)).await
    }
}
