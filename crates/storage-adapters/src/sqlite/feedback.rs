use async_trait::async_trait;
use domains::{DomainResult, Feedback, FeedbackScope, FeedbackStore};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{blob_to_uuid, internal, opt_blob, opt_uuid, uuid_to_blob};

pub struct SqliteFeedbackStore {
    pool: SqlitePool,
}

impl SqliteFeedbackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_feedback(row: &sqlx::sqlite::SqliteRow) -> Feedback {
    Feedback {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        from: blob_to_uuid(row.get::<Vec<u8>, _>("from_id").as_slice()),
        query_id: blob_to_uuid(row.get::<Vec<u8>, _>("query_id").as_slice()),
        solution_id: opt_uuid(row.get::<Option<Vec<u8>>, _>("solution_id")),
        to_expert: opt_uuid(row.get::<Option<Vec<u8>>, _>("to_expert_id")),
        message: row.get("message"),
        rating: row.get("rating"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl FeedbackStore for SqliteFeedbackStore {
    async fn insert(&self, feedback: Feedback) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO feedback
             (id, from_id, query_id, solution_id, to_expert_id, message, rating, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(feedback.id))
        .bind(uuid_to_blob(feedback.from))
        .bind(uuid_to_blob(feedback.query_id))
        .bind(opt_blob(feedback.solution_id))
        .bind(opt_blob(feedback.to_expert))
        .bind(feedback.message)
        .bind(feedback.rating)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }

    async fn find_scoped(
        &self,
        from: Uuid,
        query_id: Uuid,
        scope: FeedbackScope,
    ) -> DomainResult<Option<Feedback>> {
        let row = match scope {
            FeedbackScope::Solution(solution_id) => {
                sqlx::query(
                    "SELECT * FROM feedback
                     WHERE from_id = ? AND query_id = ? AND solution_id = ?",
                )
                .bind(uuid_to_blob(from))
                .bind(uuid_to_blob(query_id))
                .bind(uuid_to_blob(solution_id))
                .fetch_optional(&self.pool)
                .await
            }
            FeedbackScope::Expert(expert_id) => {
                sqlx::query(
                    "SELECT * FROM feedback
                     WHERE from_id = ? AND query_id = ? AND solution_id IS NULL
                       AND to_expert_id = ?",
                )
                .bind(uuid_to_blob(from))
                .bind(uuid_to_blob(query_id))
                .bind(uuid_to_blob(expert_id))
                .fetch_optional(&self.pool)
                .await
            }
            FeedbackScope::General => {
                sqlx::query(
                    "SELECT * FROM feedback
                     WHERE from_id = ? AND query_id = ? AND solution_id IS NULL
                       AND to_expert_id IS NULL",
                )
                .bind(uuid_to_blob(from))
                .bind(uuid_to_blob(query_id))
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(internal)?;
        Ok(row.as_ref().map(row_to_feedback))
    }

    async fn list_by_submitter_for_query(
        &self,
        from: Uuid,
        query_id: Uuid,
    ) -> DomainResult<Vec<Feedback>> {
        let rows = sqlx::query("SELECT * FROM feedback WHERE from_id = ? AND query_id = ?")
            .bind(uuid_to_blob(from))
            .bind(uuid_to_blob(query_id))
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows.iter().map(row_to_feedback).collect())
    }

    async fn list_for_expert(&self, expert: Uuid) -> DomainResult<Vec<Feedback>> {
        let rows =
            sqlx::query("SELECT * FROM feedback WHERE to_expert_id = ? ORDER BY created_at DESC")
                .bind(uuid_to_blob(expert))
                .fetch_all(&self.pool)
                .await
                .map_err(internal)?;
        Ok(rows.iter().map(row_to_feedback).collect())
    }

    async fn count_for_expert(&self, expert: Uuid) -> DomainResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM feedback WHERE to_expert_id = ?")
            .bind(uuid_to_blob(expert))
            .fetch_one(&self.pool)
            .await
            .map_err(internal)
    }
}
