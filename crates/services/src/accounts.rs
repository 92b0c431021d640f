//! Identity workflow: registration, login/logout, profile overview.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Account, AccountStore, DomainError, DomainResult, FeedbackStore, PasswordHasher, QueryStore,
    Role, Session, SessionStore, SolutionStore,
};
use serde::Serialize;
use uuid::Uuid;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LEN: usize = 6;

/// Activity overview shown on the profile page.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOverview {
    pub account_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub queries_posted: i64,
    pub solutions_authored: i64,
    pub feedback_received: i64,
}

pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<dyn PasswordHasher>,
    queries: Arc<dyn QueryStore>,
    solutions: Arc<dyn SolutionStore>,
    feedback: Arc<dyn FeedbackStore>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<dyn SessionStore>,
        hasher: Arc<dyn PasswordHasher>,
        queries: Arc<dyn QueryStore>,
        solutions: Arc<dyn SolutionStore>,
        feedback: Arc<dyn FeedbackStore>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            hasher,
            queries,
            solutions,
            feedback,
        }
    }

    /// Creates an account and opens a session for it.
    ///
    /// Any `role` value other than "expert" registers a plain user. The
    /// role is immutable afterwards; there is no promotion flow.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> DomainResult<(Account, Session)> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("name required".into()));
        }
        if !is_plausible_email(email) {
            return Err(DomainError::Validation("valid email required".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.accounts.find_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("email already registered".into()));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: self.hasher.hash(password)?,
            role: Role::from_registration(role),
            created_at: now,
        };
        self.accounts.insert(account.clone()).await?;

        let session = Session::open(&account, now);
        self.sessions.insert(session.clone()).await?;
        tracing::info!(account_id = %account.id, role = account.role.as_str(), "account registered");
        Ok((account, session))
    }

    /// Verifies credentials and opens a session. The failure message is
    /// identical for unknown email and wrong password.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<Session> {
        let account = self
            .accounts
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| DomainError::Unauthorized("invalid credentials".into()))?;
        if !self.hasher.verify(password, &account.password_hash) {
            return Err(DomainError::Unauthorized("invalid credentials".into()));
        }
        let session = Session::open(&account, Utc::now());
        self.sessions.insert(session.clone()).await?;
        Ok(session)
    }

    /// Removes the session. Unknown tokens are ignored.
    pub async fn logout(&self, token: Uuid) -> DomainResult<()> {
        self.sessions.remove(token).await
    }

    /// Account details plus activity counts.
    pub async fn profile(&self, account_id: Uuid) -> DomainResult<ProfileOverview> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Account", account_id))?;
        let queries_posted = self.queries.count_by_owner(account_id).await?;
        let solutions_authored = self.solutions.count_by_expert(account_id).await?;
        let feedback_received = self.feedback.count_for_expert(account_id).await?;
        Ok(ProfileOverview {
            account_id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
            queries_posted,
            solutions_authored,
            feedback_received,
        })
    }
}

/// Cheap structural check; full RFC validation is not a goal.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
