//! User-facing endpoints: profile, queries, solution browsing, tips,
//! likes, and feedback submission.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use domains::{Feedback, Query};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use services::{LikeOutcome, ProfileOverview, QueryDetail, SubmitFeedback};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::CurrentAccount;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<ProfileOverview>> {
    Ok(Json(state.accounts.profile(current.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct NewQueryBody {
    pub title: String,
    pub description: String,
}

pub async fn post_query(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<NewQueryBody>,
) -> ApiResult<(StatusCode, Json<Query>)> {
    let query = state
        .queries
        .create_query(current.id, &body.title, &body.description)
        .await?;
    Ok((StatusCode::CREATED, Json(query)))
}

pub async fn list_queries(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<Vec<Query>>> {
    Ok(Json(state.queries.list_for_owner(current.id).await?))
}

/// A query page: populated solutions plus the caller's own feedback per
/// scope, so the client can suppress duplicate submissions.
#[derive(Debug, Serialize)]
pub struct QueryPage {
    #[serde(flatten)]
    pub detail: QueryDetail,
    pub existing_feedback: HashMap<String, Feedback>,
}

pub async fn view_query(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(query_id): Path<Uuid>,
) -> ApiResult<Json<QueryPage>> {
    let detail = state.queries.query_detail(query_id).await?;
    let existing_feedback = state
        .feedback
        .existing_feedback_index(current.id, query_id)
        .await?;
    Ok(Json(QueryPage {
        detail,
        existing_feedback,
    }))
}

pub async fn list_solutions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<Value>> {
    let solutions = state.queries.solutions_for_owner(current.id).await?;
    Ok(Json(json!({ "solutions": solutions })))
}

pub async fn list_tips(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<Value>> {
    let tips = state.tips.list_published(Some(current.id)).await?;
    Ok(Json(json!({ "tips": tips })))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(tip_id): Path<Uuid>,
) -> ApiResult<Json<LikeOutcome>> {
    Ok(Json(state.tips.toggle_like(current.id, tip_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
    pub query_id: Uuid,
    pub message: String,
    pub rating: Option<i32>,
    pub solution_id: Option<Uuid>,
    pub expert_id: Option<Uuid>,
}

pub async fn post_feedback(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<FeedbackBody>,
) -> ApiResult<(StatusCode, Json<Feedback>)> {
    let feedback = state
        .feedback
        .submit_feedback(
            current.id,
            SubmitFeedback {
                query_id: body.query_id,
                message: body.message,
                rating: body.rating,
                solution_id: body.solution_id,
                expert_id: body.expert_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}
