//! Shared fixtures for the integration tests: a fully wired application
//! over an in-memory SQLite database, plus small HTTP helpers for
//! exercising the router.

use std::sync::Arc;

use api_adapters::AppState;
use auth_adapters::Argon2PasswordHasher;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use domains::{Account, Session};
use services::{AccountService, FeedbackService, KeyedLock, QueryService, TipService};
use storage_adapters::{
    InMemorySessionStore, SqliteAccountStore, SqliteFeedbackStore, SqliteQueryStore,
    SqliteSolutionStore, SqliteTipStore,
};
use tower::ServiceExt;
use uuid::Uuid;

/// A wired application backed by a fresh in-memory database.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub async fn test_app() -> TestApp {
    let pool = storage_adapters::memory_pool().await.expect("memory pool");

    let accounts = Arc::new(SqliteAccountStore::new(pool.clone()));
    let queries = Arc::new(SqliteQueryStore::new(pool.clone()));
    let solutions = Arc::new(SqliteSolutionStore::new(pool.clone()));
    let feedback = Arc::new(SqliteFeedbackStore::new(pool.clone()));
    let tips = Arc::new(SqliteTipStore::new(pool));
    let sessions = Arc::new(InMemorySessionStore::new());
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let locks = Arc::new(KeyedLock::new());

    let state = AppState {
        accounts: Arc::new(AccountService::new(
            accounts.clone(),
            sessions.clone(),
            hasher,
            queries.clone(),
            solutions.clone(),
            feedback.clone(),
        )),
        queries: Arc::new(QueryService::new(
            queries.clone(),
            solutions.clone(),
            accounts.clone(),
        )),
        feedback: Arc::new(FeedbackService::new(
            feedback,
            queries,
            solutions,
            accounts.clone(),
            locks.clone(),
        )),
        tips: Arc::new(TipService::new(tips, accounts, locks)),
        sessions,
    };
    let router = api_adapters::router(state.clone());
    TestApp { state, router }
}

impl TestApp {
    /// Registers an account through the service layer and returns it with
    /// an open session.
    pub async fn register(&self, name: &str, email: &str, role: &str) -> (Account, Session) {
        self.state
            .accounts
            .register(name, email, "password1", role)
            .await
            .expect("register fixture account")
    }

    /// Sends one request through the router and returns status + JSON body
    /// (Null when the body is empty).
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<Uuid>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}
