//! In-memory session store.
//!
//! Sessions are process-local; a restart logs everyone out. Good enough
//! for the single-node deployment this system targets.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{DomainResult, Session, SessionStore};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> DomainResult<()> {
        self.sessions.insert(session.token, session);
        Ok(())
    }

    async fn find(&self, token: Uuid) -> DomainResult<Option<Session>> {
        Ok(self.sessions.get(&token).map(|s| s.clone()))
    }

    async fn remove(&self, token: Uuid) -> DomainResult<()> {
        self.sessions.remove(&token);
        Ok(())
    }
}
