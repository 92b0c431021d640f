use async_trait::async_trait;
use domains::{DomainResult, Like, Tip, TipCategory, TipStore};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{blob_to_uuid, internal, uuid_to_blob};

pub struct SqliteTipStore {
    pool: SqlitePool,
}

impl SqliteTipStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_tip(row: &sqlx::sqlite::SqliteRow) -> Tip {
    let likes: Vec<Like> = serde_json::from_str(&row.get::<String, _>("likes")).unwrap_or_default();
    Tip {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        title: row.get("title"),
        content: row.get("content"),
        category: TipCategory::parse(&row.get::<String, _>("category"))
            .unwrap_or(TipCategory::General),
        expert_id: blob_to_uuid(row.get::<Vec<u8>, _>("expert_id").as_slice()),
        is_published: row.get("is_published"),
        likes,
        views: row.get("views"),
        created_at: row.get("created_at"),
    }
}

fn likes_json(tip: &Tip) -> DomainResult<String> {
    serde_json::to_string(&tip.likes).map_err(|e| domains::DomainError::Internal(e.to_string()))
}

#[async_trait]
impl TipStore for SqliteTipStore {
    async fn insert(&self, tip: Tip) -> DomainResult<()> {
        let likes = likes_json(&tip)?;
        sqlx::query(
            "INSERT INTO tips
             (id, title, content, category, expert_id, is_published, likes, views, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(tip.id))
        .bind(tip.title)
        .bind(tip.content)
        .bind(tip.category.as_str())
        .bind(uuid_to_blob(tip.expert_id))
        .bind(tip.is_published)
        .bind(likes)
        .bind(tip.views)
        .bind(tip.created_at)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Tip>> {
        let row = sqlx::query("SELECT * FROM tips WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.as_ref().map(row_to_tip))
    }

    async fn update(&self, tip: &Tip) -> DomainResult<()> {
        sqlx::query("UPDATE tips SET is_published = ?, likes = ? WHERE id = ?")
            .bind(tip.is_published)
            .bind(likes_json(tip)?)
            .bind(uuid_to_blob(tip.id))
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query("DELETE FROM tips WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }

    async fn list_published(&self) -> DomainResult<Vec<Tip>> {
        let rows = sqlx::query("SELECT * FROM tips WHERE is_published = 1 ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows.iter().map(row_to_tip).collect())
    }

    async fn list_by_expert(&self, expert: Uuid) -> DomainResult<Vec<Tip>> {
        let rows = sqlx::query("SELECT * FROM tips WHERE expert_id = ? ORDER BY created_at DESC")
            .bind(uuid_to_blob(expert))
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows.iter().map(row_to_tip).collect())
    }
}
