use async_trait::async_trait;
use domains::{Account, AccountStore, DomainResult, Role};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{blob_to_uuid, internal, uuid_to_blob};

pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Account {
    Account {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: Role::parse(&row.get::<String, _>("role")).unwrap_or(Role::User),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn insert(&self, account: Account) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO accounts (id, name, email, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(account.id))
        .bind(account.name)
        .bind(account.email)
        .bind(account.password_hash)
        .bind(account.role.as_str())
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.as_ref().map(row_to_account))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.as_ref().map(row_to_account))
    }
}
