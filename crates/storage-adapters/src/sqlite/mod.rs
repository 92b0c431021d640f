//! SQLite store implementations.
//!
//! This module maps between the relational rows and the `domains`
//! models. UUIDs are stored as 16-byte blobs; the append-only
//! solution list and the like collection live in JSON text columns.

mod accounts;
mod feedback;
mod queries;
mod solutions;
mod tips;

pub use accounts::SqliteAccountStore;
pub use feedback::SqliteFeedbackStore;
pub use queries::SqliteQueryStore;
pub use solutions::SqliteSolutionStore;
pub use tips::SqliteTipStore;

use std::str::FromStr;

use domains::{DomainError, DomainResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

/// Opens a pool for `url` (e.g. `sqlite:nutrihub.db` or
/// `sqlite::memory:`), creating the database file if needed.
pub async fn connect(url: &str) -> DomainResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(internal)?
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(internal)
}

/// Persistence failures are opaque to callers; the detail goes to the log.
pub(crate) fn internal(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "storage failure");
    DomainError::Internal(err.to_string())
}

pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

pub(crate) fn opt_blob(id: Option<Uuid>) -> Option<Vec<u8>> {
    id.map(uuid_to_blob)
}

pub(crate) fn opt_uuid(blob: Option<Vec<u8>>) -> Option<Uuid> {
    blob.map(|b| blob_to_uuid(&b))
}

/// A single-connection in-memory database with the schema applied.
/// One connection only: each SQLite `:memory:` connection is its own
/// database, so a larger pool would shard the data.
pub async fn memory_pool() -> DomainResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .map_err(internal)?;
    crate::schema::apply(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    memory_pool().await.expect("in-memory pool")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{
        Account, AccountStore, Feedback, FeedbackScope, FeedbackStore, Query, QueryStore, Role,
        Solution, SolutionStore, Tip, TipCategory, TipStore,
    };

    async fn seed_account(store: &SqliteAccountStore, role: Role) -> Account {
        let account = Account {
            id: Uuid::new_v4(),
            name: "Dana".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2$x".into(),
            role,
            created_at: Utc::now(),
        };
        store.insert(account.clone()).await.unwrap();
        account
    }

    #[tokio::test]
    async fn account_round_trip_and_email_lookup() {
        let pool = test_pool().await;
        let store = SqliteAccountStore::new(pool);
        let account = seed_account(&store, Role::Expert).await;

        let by_id = store.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(by_id.role, Role::Expert);
        let by_email = store.find_by_email(&account.email).await.unwrap().unwrap();
        assert_eq!(by_email.id, account.id);
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn query_solution_list_is_append_only_ordered() {
        let pool = test_pool().await;
        let store = SqliteQueryStore::new(pool);
        let owner = Uuid::new_v4();
        let query = Query {
            id: Uuid::new_v4(),
            title: "T".into(),
            description: "D".into(),
            posted_by: owner,
            solution_ids: vec![],
            created_at: Utc::now(),
        };
        store.insert(query.clone()).await.unwrap();

        let s1 = Uuid::new_v4();
        let s2 = Uuid::new_v4();
        store.append_solution(query.id, s1).await.unwrap();
        store.append_solution(query.id, s2).await.unwrap();

        let loaded = store.find_by_id(query.id).await.unwrap().unwrap();
        assert_eq!(loaded.solution_ids, vec![s1, s2]);
        assert_eq!(store.count_by_owner(owner).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn solution_update_persists_state() {
        let pool = test_pool().await;
        let store = SqliteSolutionStore::new(pool);
        let expert = Uuid::new_v4();
        let mut solution = Solution::new(Uuid::new_v4(), expert, "draft".into(), Utc::now());
        store.insert(solution.clone()).await.unwrap();

        solution.toggle_submission(Utc::now());
        solution.set_content("final".into(), Utc::now());
        store.update(&solution).await.unwrap();

        let loaded = store.find_by_id(solution.id).await.unwrap().unwrap();
        assert!(loaded.is_submitted);
        assert_eq!(loaded.content, "final");
        assert!(loaded.submitted_at.is_some());
        assert!(loaded.last_edited_at.is_some());
        assert_eq!(store.count_by_expert(expert).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn feedback_scoped_lookup_distinguishes_scopes() {
        let pool = test_pool().await;
        let store = SqliteFeedbackStore::new(pool);
        let from = Uuid::new_v4();
        let query_id = Uuid::new_v4();
        let expert = Uuid::new_v4();
        let solution = Uuid::new_v4();

        let general = Feedback {
            id: Uuid::new_v4(),
            from,
            query_id,
            solution_id: None,
            to_expert: None,
            message: "general".into(),
            rating: None,
            created_at: Utc::now(),
        };
        let scoped = Feedback {
            id: Uuid::new_v4(),
            from,
            query_id,
            solution_id: Some(solution),
            to_expert: Some(expert),
            message: "solution".into(),
            rating: Some(5),
            created_at: Utc::now(),
        };
        store.insert(general.clone()).await.unwrap();
        store.insert(scoped.clone()).await.unwrap();

        let hit = store
            .find_scoped(from, query_id, FeedbackScope::General)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.message, "general");

        let hit = store
            .find_scoped(from, query_id, FeedbackScope::Solution(solution))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.rating, Some(5));

        assert!(store
            .find_scoped(from, query_id, FeedbackScope::Expert(Uuid::new_v4()))
            .await
            .unwrap()
            .is_none());

        let mine = store
            .list_by_submitter_for_query(from, query_id)
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(store.count_for_expert(expert).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn tip_likes_survive_round_trip_and_delete_is_permanent() {
        let pool = test_pool().await;
        let store = SqliteTipStore::new(pool);
        let expert = Uuid::new_v4();
        let mut tip = Tip {
            id: Uuid::new_v4(),
            title: "Hydration".into(),
            content: "Drink water.".into(),
            category: TipCategory::HeartHealth,
            expert_id: expert,
            is_published: true,
            likes: vec![],
            views: 0,
            created_at: Utc::now(),
        };
        store.insert(tip.clone()).await.unwrap();

        let liker = Uuid::new_v4();
        tip.toggle_like(liker, Utc::now());
        store.update(&tip).await.unwrap();

        let loaded = store.find_by_id(tip.id).await.unwrap().unwrap();
        assert_eq!(loaded.category, TipCategory::HeartHealth);
        assert!(loaded.liked_by(liker));
        assert_eq!(loaded.like_count(), 1);

        // Unpublished tips drop out of the public listing.
        tip.is_published = false;
        store.update(&tip).await.unwrap();
        assert!(store.list_published().await.unwrap().is_empty());
        assert_eq!(store.list_by_expert(expert).await.unwrap().len(), 1);

        store.delete(tip.id).await.unwrap();
        assert!(store.find_by_id(tip.id).await.unwrap().is_none());
    }
}
