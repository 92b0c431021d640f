//! Bearer-session authentication middleware.
//!
//! The session token travels in `Authorization: Bearer <uuid>`. On
//! success the resolved identity is attached as a request extension;
//! handlers receive it via `Extension<CurrentAccount>` and pass it to
//! the services explicitly.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use domains::{DomainError, Role};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated actor for the current request.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim()
        .parse()
        .ok()
}

async fn resolve(state: &AppState, headers: &HeaderMap) -> Result<CurrentAccount, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| DomainError::Unauthorized("login required".to_string()))?;
    let session = state
        .sessions
        .find(token)
        .await?
        .ok_or_else(|| DomainError::Unauthorized("session expired or unknown".to_string()))?;
    Ok(CurrentAccount {
        id: session.account_id,
        name: session.name,
        role: session.role,
    })
}

/// Gate for routes that need any authenticated account.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = resolve(&state, req.headers()).await?;
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Gate for the expert surface: authenticated and role=expert.
pub async fn require_expert(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = resolve(&state, req.headers()).await?;
    if current.role != Role::Expert {
        return Err(DomainError::Unauthorized("expert role required".to_string()).into());
    }
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_parses_valid_uuid() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        assert_eq!(bearer_token(&headers), Some(token));
    }

    #[test]
    fn bearer_token_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
