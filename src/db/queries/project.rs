use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::{like_pattern, PgStore, LIKE_ESCAPE};
use crate::db::models::pagination::PageRequest;
use crate::db::models::project::{Project, ProjectFilter};
use crate::db::repository::{ProjectRepository, StoreResult};
use crate::db::timed;

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProjectFilter) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(client_id) = &filter.client_id {
        qb.push(" AND client_id = ").push_bind(client_id.clone());
    }
    if let Some(employee_id) = &filter.employee_id {
        qb.push(" AND ")
            .push_bind(employee_id.clone())
            .push(" = ANY(employee_ids)");
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern = like_pattern(term);
        qb.push(" AND (id ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR name ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(LIKE_ESCAPE)
            .push(")");
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn create(&self, project: &Project) -> StoreResult<()> {
        timed(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO projects (id, name, description, client_id, status, progress,
                                      employee_ids, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(&project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(&project.client_id)
            .bind(project.status)
            .bind(project.progress)
            .bind(&project.employee_ids)
            .bind(project.created_at)
            .bind(project.updated_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Project>> {
        timed(
            self.timeout,
            sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn update(&self, project: &Project) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query(
                r#"
                UPDATE projects
                SET name = $2, description = $3, status = $4, progress = $5, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(&project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.status)
            .bind(project.progress)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn assign_employees(&self, id: &str, employee_ids: &[String]) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query("UPDATE projects SET employee_ids = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(employee_ids)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM projects WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &ProjectFilter, page: PageRequest) -> StoreResult<(Vec<Project>, i64)> {
        let total = self.count(filter).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM projects");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let projects = timed(self.timeout, qb.build_query_as::<Project>().fetch_all(&self.pool)).await?;
        Ok((projects, total))
    }

    async fn count(&self, filter: &ProjectFilter) -> StoreResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM projects");
        push_filter(&mut qb, filter);
        timed(self.timeout, qb.build_query_scalar::<i64>().fetch_one(&self.pool)).await
    }

    async fn ids(&self, filter: &ProjectFilter) -> StoreResult<Vec<String>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM projects");
        push_filter(&mut qb, filter);
        timed(self.timeout, qb.build_query_scalar::<String>().fetch_all(&self.pool)).await
    }
}
