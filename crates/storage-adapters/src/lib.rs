//! Persistence adapters for NutriHub.
//!
//! SQLite implementations of the `domains` store ports, plus an
//! in-memory session store. The schema is bootstrapped at startup by
//! [`schema::apply`].

pub mod schema;
pub mod session;
pub mod sqlite;

pub use session::InMemorySessionStore;
pub use sqlite::{
    connect, memory_pool, SqliteAccountStore, SqliteFeedbackStore, SqliteQueryStore,
    SqliteSolutionStore, SqliteTipStore,
};
