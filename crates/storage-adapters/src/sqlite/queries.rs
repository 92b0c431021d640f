use async_trait::async_trait;
use domains::{DomainResult, Query, QueryStore};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{blob_to_uuid, internal, uuid_to_blob};

pub struct SqliteQueryStore {
    pool: SqlitePool,
}

impl SqliteQueryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_query(row: &sqlx::sqlite::SqliteRow) -> Query {
    let ids: Vec<Uuid> =
        serde_json::from_str(&row.get::<String, _>("solution_ids")).unwrap_or_default();
    Query {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        title: row.get("title"),
        description: row.get("description"),
        posted_by: blob_to_uuid(row.get::<Vec<u8>, _>("posted_by").as_slice()),
        solution_ids: ids,
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl QueryStore for SqliteQueryStore {
    async fn insert(&self, query: Query) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO queries (id, title, description, posted_by, solution_ids, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(query.id))
        .bind(query.title)
        .bind(query.description)
        .bind(uuid_to_blob(query.posted_by))
        .bind(serde_json::to_string(&query.solution_ids).map_err(|e| {
            domains::DomainError::Internal(e.to_string())
        })?)
        .bind(query.created_at)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Query>> {
        let row = sqlx::query("SELECT * FROM queries WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.as_ref().map(row_to_query))
    }

    /// Read-modify-write on the JSON list; the service layer treats the
    /// preceding solution insert and this append as separate writes.
    async fn append_solution(&self, query_id: Uuid, solution_id: Uuid) -> DomainResult<()> {
        let row = sqlx::query("SELECT solution_ids FROM queries WHERE id = ?")
            .bind(uuid_to_blob(query_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?
            .ok_or_else(|| domains::DomainError::not_found("Query", query_id))?;
        let mut ids: Vec<Uuid> =
            serde_json::from_str(&row.get::<String, _>("solution_ids")).unwrap_or_default();
        ids.push(solution_id);
        sqlx::query("UPDATE queries SET solution_ids = ? WHERE id = ?")
            .bind(serde_json::to_string(&ids).map_err(|e| {
                domains::DomainError::Internal(e.to_string())
            })?)
            .bind(uuid_to_blob(query_id))
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }

    async fn list_all(&self) -> DomainResult<Vec<Query>> {
        let rows = sqlx::query("SELECT * FROM queries ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows.iter().map(row_to_query).collect())
    }

    async fn list_by_owner(&self, owner: Uuid) -> DomainResult<Vec<Query>> {
        let rows = sqlx::query("SELECT * FROM queries WHERE posted_by = ? ORDER BY created_at DESC")
            .bind(uuid_to_blob(owner))
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows.iter().map(row_to_query).collect())
    }

    async fn count_by_owner(&self, owner: Uuid) -> DomainResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM queries WHERE posted_by = ?")
            .bind(uuid_to_blob(owner))
            .fetch_one(&self.pool)
            .await
            .map_err(internal)
    }
}
