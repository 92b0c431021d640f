//! Registration, login, and logout endpoints.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::bearer_token;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Anything other than "expert" registers a user.
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionBody {
    pub token: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub role: domains::Role,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> ApiResult<(StatusCode, Json<SessionBody>)> {
    let (account, session) = state
        .accounts
        .register(&body.name, &body.email, &body.password, &body.role)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionBody {
            token: session.token,
            account_id: account.id,
            name: account.name,
            role: account.role,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> ApiResult<Json<SessionBody>> {
    let session = state.accounts.login(&body.email, &body.password).await?;
    Ok(Json(SessionBody {
        token: session.token,
        account_id: session.account_id,
        name: session.name,
        role: session.role,
    }))
}

/// Discards the presented session. Succeeds even without one.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    if let Some(token) = bearer_token(&headers) {
        state.accounts.logout(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
