use async_trait::async_trait;
use domains::{DomainResult, Solution, SolutionStore};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{blob_to_uuid, internal, uuid_to_blob};

pub struct SqliteSolutionStore {
    pool: SqlitePool,
}

impl SqliteSolutionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_solution(row: &sqlx::sqlite::SqliteRow) -> Solution {
    Solution {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        query_id: blob_to_uuid(row.get::<Vec<u8>, _>("query_id").as_slice()),
        expert_id: blob_to_uuid(row.get::<Vec<u8>, _>("expert_id").as_slice()),
        content: row.get("content"),
        is_submitted: row.get("is_submitted"),
        submitted_at: row.get("submitted_at"),
        last_edited_at: row.get("last_edited_at"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl SolutionStore for SqliteSolutionStore {
    async fn insert(&self, solution: Solution) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO solutions
             (id, query_id, expert_id, content, is_submitted, submitted_at, last_edited_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(solution.id))
        .bind(uuid_to_blob(solution.query_id))
        .bind(uuid_to_blob(solution.expert_id))
        .bind(solution.content)
        .bind(solution.is_submitted)
        .bind(solution.submitted_at)
        .bind(solution.last_edited_at)
        .bind(solution.created_at)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Solution>> {
        let row = sqlx::query("SELECT * FROM solutions WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.as_ref().map(row_to_solution))
    }

    async fn update(&self, solution: &Solution) -> DomainResult<()> {
        sqlx::query(
            "UPDATE solutions
             SET content = ?, is_submitted = ?, submitted_at = ?, last_edited_at = ?
             WHERE id = ?",
        )
        .bind(&solution.content)
        .bind(solution.is_submitted)
        .bind(solution.submitted_at)
        .bind(solution.last_edited_at)
        .bind(uuid_to_blob(solution.id))
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }

    async fn list_by_query(&self, query_id: Uuid) -> DomainResult<Vec<Solution>> {
        let rows =
            sqlx::query("SELECT * FROM solutions WHERE query_id = ? ORDER BY created_at ASC")
                .bind(uuid_to_blob(query_id))
                .fetch_all(&self.pool)
                .await
                .map_err(internal)?;
        Ok(rows.iter().map(row_to_solution).collect())
    }

    async fn list_by_expert(&self, expert: Uuid) -> DomainResult<Vec<Solution>> {
        let rows =
            sqlx::query("SELECT * FROM solutions WHERE expert_id = ? ORDER BY created_at DESC")
                .bind(uuid_to_blob(expert))
                .fetch_all(&self.pool)
                .await
                .map_err(internal)?;
        Ok(rows.iter().map(row_to_solution).collect())
    }

    async fn count_by_expert(&self, expert: Uuid) -> DomainResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM solutions WHERE expert_id = ?")
            .bind(uuid_to_blob(expert))
            .fetch_one(&self.pool)
            .await
            .map_err(internal)
    }
}
