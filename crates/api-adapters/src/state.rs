//! Shared handler state: one `Arc` per service plus the session store.

use std::sync::Arc;

use domains::SessionStore;
use services::{AccountService, FeedbackService, QueryService, TipService};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub queries: Arc<QueryService>,
    pub feedback: Arc<FeedbackService>,
    pub tips: Arc<TipService>,
    pub sessions: Arc<dyn SessionStore>,
}
