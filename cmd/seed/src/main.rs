//! Seeds a demo dataset: one user, one expert, a query with a submitted
//! solution, and a couple of published tips.

use std::sync::Arc;

use auth_adapters::Argon2PasswordHasher;
use configs::AppConfig;
use secrecy::ExposeSecret;
use services::{AccountService, KeyedLock, QueryService, TipService};
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
    let locks = Arc::new(KeyedLock::new());

    let account_svc = AccountService::new(
        accounts.clone(),
        Arc::new(InMemorySessionStore::new()),
        Arc::new(Argon2PasswordHasher::new()),
        queries.clone(),
        solutions.clone(),
        feedback,
    );
    let query_svc = QueryService::new(queries, solutions, accounts.clone());
    let tip_svc = TipService::new(tips, accounts, locks);

    let (user, _) = account_svc
        .register("Sam Park", "sam@example.com", "password1", "user")
        .await?;
    let (expert, _) = account_svc
        .register("Dr. Elena Ruiz", "elena@example.com", "password1", "expert")
        .await?;

    let query = query_svc
        .create_query(
            user.id,
            "Low sodium diet?",
            "My doctor suggested cutting sodium. Where do I start?",
        )
        .await?;
    let solution = query_svc
        .attach_solution(expert.id, query.id, "Reduce to 1500mg/day and cook at home.")
        .await?;
    query_svc.toggle_submission(expert.id, solution.id).await?;

    tip_svc
        .publish_tip(
            expert.id,
            "Read the label",
            "Sodium hides in bread and sauces; check per-serving amounts.",
            Some("heart-health"),
        )
        .await?;
    tip_svc
        .publish_tip(
            expert.id,
            "Hydration first",
            "Most afternoon headaches are dehydration. Keep a bottle at your desk.",
            None,
        )
        .await?;

    tracing::info!(user = %user.id, expert = %expert.id, query = %query.id, "seed complete");
    Ok(())
}
