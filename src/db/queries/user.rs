use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::{like_pattern, PgStore, LIKE_ESCAPE};
use crate::db::models::pagination::PageRequest;
use crate::db::models::user::{User, UserFilter};
use crate::db::repository::{StoreResult, UserRepository};
use crate::db::timed;

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE TRUE");
    if let Some(role) = filter.role {
        qb.push(" AND role = ").push_bind(role);
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern = like_pattern(term);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR company ILIKE ")
            .push_bind(pattern)
            .push(LIKE_ESCAPE)
            .push(")");
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: &User) -> StoreResult<()> {
        timed(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO users (id, email, password_hash, name, phone, role, status,
                                   department, salary, company, address, hide, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.phone)
            .bind(user.role)
            .bind(user.status)
            .bind(&user.department)
            .bind(user.salary)
            .bind(&user.company)
            .bind(&user.address)
            .bind(user.hide)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        timed(
            self.timeout,
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        timed(
            self.timeout,
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn update(&self, user: &User) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query(
                r#"
                UPDATE users
                SET email = $2, password_hash = $3, name = $4, phone = $5, role = $6, status = $7,
                    department = $8, salary = $9, company = $10, address = $11, hide = $12,
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.phone)
            .bind(user.role)
            .bind(user.status)
            .bind(&user.department)
            .bind(user.salary)
            .bind(&user.company)
            .bind(&user.address)
            .bind(user.hide)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> StoreResult<(Vec<User>, i64)> {
        let total = self.count(filter).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM users");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at, id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let users = timed(self.timeout, qb.build_query_as::<User>().fetch_all(&self.pool)).await?;
        Ok((users, total))
    }

    async fn count(&self, filter: &UserFilter) -> StoreResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filter(&mut qb, filter);
        timed(self.timeout, qb.build_query_scalar::<i64>().fetch_one(&self.pool)).await
    }
}
