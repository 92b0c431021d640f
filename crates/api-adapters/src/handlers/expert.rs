//! Expert-facing endpoints: the dashboard, solution lifecycle, tip
//! management, and received feedback.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use domains::{Solution, Tip};
use serde::Deserialize;
use serde_json::{json, Value};
use services::{ExpertQueryView, FeedbackView, SubmissionState};
use uuid::Uuid;

use crate::auth::CurrentAccount;
use crate::error::ApiResult;
use crate::state::AppState;

/// Dashboard: every query, populated only with the caller's solutions.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<Vec<ExpertQueryView>>> {
    Ok(Json(state.queries.list_for_expert(current.id).await?))
}

pub async fn list_solutions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<Value>> {
    let solutions = state.queries.solutions_by_expert(current.id).await?;
    Ok(Json(json!({ "solutions": solutions })))
}

#[derive(Debug, Deserialize)]
pub struct NewSolutionBody {
    pub query_id: Uuid,
    pub content: String,
}

pub async fn post_solution(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<NewSolutionBody>,
) -> ApiResult<(StatusCode, Json<Solution>)> {
    let solution = state
        .queries
        .attach_solution(current.id, body.query_id, &body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(solution)))
}

pub async fn toggle_solution(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(solution_id): Path<Uuid>,
) -> ApiResult<Json<SubmissionState>> {
    Ok(Json(
        state.queries.toggle_submission(current.id, solution_id).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSolutionBody {
    pub content: String,
}

pub async fn update_solution(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(solution_id): Path<Uuid>,
    Json(body): Json<UpdateSolutionBody>,
) -> ApiResult<Json<Solution>> {
    Ok(Json(
        state
            .queries
            .update_solution_content(current.id, solution_id, &body.content)
            .await?,
    ))
}

pub async fn solution_for_edit(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(solution_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let solution = state
        .queries
        .solution_for_edit(current.id, solution_id)
        .await?;
    Ok(Json(json!({
        "content": solution.content,
        "is_submitted": solution.is_submitted,
    })))
}

pub async fn view_feedback(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<Vec<FeedbackView>>> {
    Ok(Json(state.feedback.feedback_for_expert(current.id).await?))
}

pub async fn list_tips(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<Vec<Tip>>> {
    Ok(Json(state.tips.tips_for_expert(current.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct NewTipBody {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
}

pub async fn publish_tip(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<NewTipBody>,
) -> ApiResult<(StatusCode, Json<Tip>)> {
    let tip = state
        .tips
        .publish_tip(
            current.id,
            &body.title,
            &body.content,
            body.category.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(tip)))
}

pub async fn toggle_tip(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(tip_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let tip = state.tips.toggle_tip_status(current.id, tip_id).await?;
    Ok(Json(json!({ "is_published": tip.is_published })))
}

pub async fn delete_tip(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(tip_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.tips.delete_tip(current.id, tip_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
