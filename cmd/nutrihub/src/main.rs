//! NutriHub server entry point: wires the SQLite adapters, the workflow
//! services, and the axum router together.

use std::sync::Arc;

use api_adapters::AppState;
use auth_adapters::Argon2PasswordHasher;
use configs::AppConfig;
use secrecy::ExposeSecret;
use services::{AccountService, FeedbackService, KeyedLock, QueryService, TipService};
use storage_adapters::{
    InMemorySessionStore, SqliteAccountStore, SqliteFeedbackStore, SqliteQueryStore,
    SqliteSolutionStore, SqliteTipStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    let pool = storage_adapters::connect(config.database.url.expose_secret()).await?;
    storage_adapters::schema::apply(&pool).await?;

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

    let app = api_adapters::router(state);
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "nutrihub listening");
    axum::serve(listener, app).await?;
    Ok(())
}
