//! # Port Traits
//!
//! Persistence and credential contracts the adapters must implement.
//! With the `testing` feature enabled, mockall generates `MockXxx` types
//! for every port so service logic can be tested without a database.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainResult;
use crate::models::{Account, Feedback, FeedbackScope, Query, Session, Solution, Tip};

/// Identity persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, account: Account) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Account>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>>;
}

/// Query persistence. The solution list is append-only.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait QueryStore: Send + Sync {
    async fn insert(&self, query: Query) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Query>>;
    /// Appends a solution id to the query's ordered list.
    async fn append_solution(&self, query_id: Uuid, solution_id: Uuid) -> DomainResult<()>;
    /// All queries, newest first.
    async fn list_all(&self) -> DomainResult<Vec<Query>>;
    /// One owner's queries, newest first.
    async fn list_by_owner(&self, owner: Uuid) -> DomainResult<Vec<Query>>;
    async fn count_by_owner(&self, owner: Uuid) -> DomainResult<i64>;
}

/// Solution persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SolutionStore: Send + Sync {
    async fn insert(&self, solution: Solution) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Solution>>;
    /// Persists content/flag/timestamp changes for an existing solution.
    async fn update(&self, solution: &Solution) -> DomainResult<()>;
    /// A query's solutions in creation order.
    async fn list_by_query(&self, query_id: Uuid) -> DomainResult<Vec<Solution>>;
    /// One expert's solutions, newest first.
    async fn list_by_expert(&self, expert: Uuid) -> DomainResult<Vec<Solution>>;
    async fn count_by_expert(&self, expert: Uuid) -> DomainResult<i64>;
}

/// Feedback persistence. Rows are immutable once inserted.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn insert(&self, feedback: Feedback) -> DomainResult<()>;
    /// The submitter's feedback for (query, scope), if any.
    async fn find_scoped(
        &self,
        from: Uuid,
        query_id: Uuid,
        scope: FeedbackScope,
    ) -> DomainResult<Option<Feedback>>;
    /// All of one submitter's feedback for a query.
    async fn list_by_submitter_for_query(
        &self,
        from: Uuid,
        query_id: Uuid,
    ) -> DomainResult<Vec<Feedback>>;
    /// Feedback addressed to an expert, newest first.
    async fn list_for_expert(&self, expert: Uuid) -> DomainResult<Vec<Feedback>>;
    async fn count_for_expert(&self, expert: Uuid) -> DomainResult<i64>;
}

/// Tip persistence, likes included.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TipStore: Send + Sync {
    async fn insert(&self, tip: Tip) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Tip>>;
    /// Persists flag/like changes for an existing tip.
    async fn update(&self, tip: &Tip) -> DomainResult<()>;
    /// Irreversible; removes the tip and its likes.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
    /// Published tips only, newest first.
    async fn list_published(&self) -> DomainResult<Vec<Tip>>;
    /// One expert's tips, drafts included, newest first.
    async fn list_by_expert(&self, expert: Uuid) -> DomainResult<Vec<Tip>>;
}

/// Session persistence. Tokens are opaque to the core.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> DomainResult<()>;
    async fn find(&self, token: Uuid) -> DomainResult<Option<Session>>;
    /// Idempotent; removing an unknown token is not an error.
    async fn remove(&self, token: Uuid) -> DomainResult<()>;
}

/// Credential hashing contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> DomainResult<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}
