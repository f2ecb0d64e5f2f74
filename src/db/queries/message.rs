use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::PgStore;
use crate::db::models::message::Message;
use crate::db::models::pagination::PageRequest;
use crate::db::repository::{MessageRepository, StoreResult};
use crate::db::timed;

fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, project_ids: Option<&[String]>) {
    if let Some(ids) = project_ids {
        qb.push(" WHERE project_id = ANY(").push_bind(ids.to_vec()).push(")");
    }
}

#[async_trait]
impl MessageRepository for PgStore {
    async fn create(&self, message: &Message) -> StoreResult<()> {
        timed(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO messages (id, content, sender_id, project_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&message.id)
            .bind(&message.content)
            .bind(&message.sender_id)
            .bind(&message.project_id)
            .bind(message.created_at)
            .bind(message.updated_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Message>> {
        timed(
            self.timeout,
            sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM messages WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        project_ids: Option<&[String]>,
        page: PageRequest,
    ) -> StoreResult<(Vec<Message>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM messages");
        push_scope(&mut count, project_ids);
        let total = timed(self.timeout, count.build_query_scalar::<i64>().fetch_one(&self.pool)).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM messages");
        push_scope(&mut qb, project_ids);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let messages = timed(self.timeout, qb.build_query_as::<Message>().fetch_all(&self.pool)).await?;
        Ok((messages, total))
    }
}
