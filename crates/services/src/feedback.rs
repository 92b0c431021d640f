//! Feedback workflow: scoped rating/comment submission with per-scope
//! uniqueness, plus the expert-facing read aggregations.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domains::{
    AccountStore, DomainError, DomainResult, Feedback, FeedbackScope, FeedbackStore, QueryStore,
    SolutionStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::lock::KeyedLock;
use crate::queries::NameCache;

/// A feedback row populated for the expert's feedback page.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackView {
    pub feedback: Feedback,
    pub from_name: String,
    pub query_title: String,
    pub solution_content: Option<String>,
}

/// Input for a feedback submission. Scope precedence: a solution target
/// wins over an expert target; with neither, the feedback is general.
#[derive(Debug, Clone)]
pub struct SubmitFeedback {
    pub query_id: Uuid,
    pub message: String,
    pub rating: Option<i32>,
    pub solution_id: Option<Uuid>,
    pub expert_id: Option<Uuid>,
}

pub struct FeedbackService {
    feedback: Arc<dyn FeedbackStore>,
    queries: Arc<dyn QueryStore>,
    solutions: Arc<dyn SolutionStore>,
    accounts: Arc<dyn AccountStore>,
    locks: Arc<KeyedLock>,
}

impl FeedbackService {
    pub fn new(
        feedback: Arc<dyn FeedbackStore>,
        queries: Arc<dyn QueryStore>,
        solutions: Arc<dyn SolutionStore>,
        accounts: Arc<dyn AccountStore>,
        locks: Arc<KeyedLock>,
    ) -> Self {
        Self {
            feedback,
            queries,
            solutions,
            accounts,
            locks,
        }
    }

    /// Persists one piece of feedback for (submitter, query, scope).
    ///
    /// The existence check and the insert run under a keyed mutex so two
    /// concurrent submissions from the same account cannot both pass the
    /// check (single-node assumption).
    #[tracing::instrument(skip_all, fields(from = %from, query_id = %input.query_id))]
    pub async fn submit_feedback(&self, from: Uuid, input: SubmitFeedback) -> DomainResult<Feedback> {
        let message = input.message.trim();
        if message.is_empty() {
            return Err(DomainError::Validation("message required".into()));
        }
        if let Some(rating) = input.rating {
            if !(1..=5).contains(&rating) {
                return Err(DomainError::Validation(
                    "rating must be between 1 and 5".into(),
                ));
            }
        }

        let scope = FeedbackScope::resolve(input.solution_id, input.expert_id);
        let lock_key = format!("feedback:{from}:{}:{}", input.query_id, scope.key());
        let _guard = self.locks.acquire(&lock_key).await;

        if self
            .feedback
            .find_scoped(from, input.query_id, scope)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(
                "feedback already submitted for this item".into(),
            ));
        }

        let feedback = Feedback {
            id: Uuid::new_v4(),
            from,
            query_id: input.query_id,
            solution_id: input.solution_id,
            to_expert: input.expert_id,
            message: message.to_string(),
            rating: input.rating,
            created_at: Utc::now(),
        };
        self.feedback.insert(feedback.clone()).await?;
        tracing::info!(feedback_id = %feedback.id, scope = %scope.key(), "feedback submitted");
        Ok(feedback)
    }

    /// Feedback addressed to the expert, populated with the submitter's
    /// name, query title, and solution content. Newest first.
    pub async fn feedback_for_expert(&self, expert: Uuid) -> DomainResult<Vec<FeedbackView>> {
        let rows = self.feedback.list_for_expert(expert).await?;
        let mut names = NameCache::new(self.accounts.clone());
        let mut views = Vec::with_capacity(rows.len());
        for feedback in rows {
            let from_name = names.get(feedback.from).await?;
            let query_title = match self.queries.find_by_id(feedback.query_id).await? {
                Some(q) => q.title,
                None => String::new(),
            };
            let solution_content = match feedback.solution_id {
                Some(sid) => self.solutions.find_by_id(sid).await?.map(|s| s.content),
                None => None,
            };
            views.push(FeedbackView {
                feedback,
                from_name,
                query_title,
                solution_content,
            });
        }
        Ok(views)
    }

    /// Maps scope-key (solution uuid, `expert_<uuid>`, or `general`) to the
    /// submitter's own feedback for the query. Drives duplicate-submission
    /// suppression on the query page.
    pub async fn existing_feedback_index(
        &self,
        from: Uuid,
        query_id: Uuid,
    ) -> DomainResult<HashMap<String, Feedback>> {
        let rows = self
            .feedback
            .list_by_submitter_for_query(from, query_id)
            .await?;
        Ok(rows
            .into_iter()
            .map(|f| (f.scope().key(), f))
            .collect())
    }
}
