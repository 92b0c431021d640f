//! # Domain Models
//!
//! These structs represent the core entities of NutriHub.
//! Identifiers are UUID v4; timestamps are UTC throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned at registration. There is no promotion flow; the role
/// never changes after the account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Expert,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Expert => "expert",
        }
    }

    /// Anything other than the literal "expert" registers a plain user.
    pub fn from_registration(raw: &str) -> Self {
        if raw == "expert" {
            Role::Expert
        } else {
            Role::User
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Role::User),
            "expert" => Some(Role::Expert),
            _ => None,
        }
    }
}

/// A registered identity, either a question-asking user or an expert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Unique across all accounts.
    pub email: String,
    /// Argon2 PHC string; never leaves the identity layer.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A nutrition/health question posted by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub posted_by: Uuid,
    /// Solution ids in creation order. Append-only: no operation removes
    /// an entry once linked.
    pub solution_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// An expert's answer to exactly one Query, with draft/submitted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub id: Uuid,
    pub query_id: Uuid,
    pub expert_id: Uuid,
    pub content: String,
    pub is_submitted: bool,
    /// Set on the first draft→submitted transition, never cleared or reset.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Set whenever content changes after creation.
    pub last_edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Solution {
    pub fn new(query_id: Uuid, expert_id: Uuid, content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            query_id,
            expert_id,
            content,
            is_submitted: false,
            submitted_at: None,
            last_edited_at: None,
            created_at: now,
        }
    }

    /// Flips the submitted flag. The submission timestamp records the
    /// *first* submission only; withdrawing and re-submitting later keeps
    /// the original value.
    pub fn toggle_submission(&mut self, now: DateTime<Utc>) {
        self.is_submitted = !self.is_submitted;
        if self.is_submitted && self.submitted_at.is_none() {
            self.submitted_at = Some(now);
        }
    }

    /// Replaces content. The edit timestamp moves only when the content
    /// actually differs from what is stored.
    pub fn set_content(&mut self, content: String, now: DateTime<Utc>) {
        if self.content != content {
            self.content = content;
            self.last_edited_at = Some(now);
        }
    }
}

/// The target granularity of a piece of feedback: a specific solution,
/// a specific expert, or the query as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackScope {
    Solution(Uuid),
    Expert(Uuid),
    General,
}

impl FeedbackScope {
    /// Precedence when both targets are supplied: solution wins over expert.
    pub fn resolve(solution_id: Option<Uuid>, expert_id: Option<Uuid>) -> Self {
        if let Some(s) = solution_id {
            FeedbackScope::Solution(s)
        } else if let Some(e) = expert_id {
            FeedbackScope::Expert(e)
        } else {
            FeedbackScope::General
        }
    }

    /// Stable key used to index a submitter's feedback per query.
    pub fn key(&self) -> String {
        match self {
            FeedbackScope::Solution(id) => id.to_string(),
            FeedbackScope::Expert(id) => format!("expert_{id}"),
            FeedbackScope::General => "general".to_string(),
        }
    }
}

/// A rating/comment from one account about a query, optionally scoped to a
/// solution or an expert. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub from: Uuid,
    pub query_id: Uuid,
    pub solution_id: Option<Uuid>,
    pub to_expert: Option<Uuid>,
    pub message: String,
    /// Integer in [1,5] when present.
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn scope(&self) -> FeedbackScope {
        FeedbackScope::resolve(self.solution_id, self.to_expert)
    }
}

/// Tip subject categories. Unknown non-empty strings are rejected at the
/// workflow layer; an omitted/empty category falls back to General.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TipCategory {
    General,
    WeightLoss,
    WeightGain,
    HeartHealth,
    Diabetes,
    SportsNutrition,
}

impl TipCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipCategory::General => "general",
            TipCategory::WeightLoss => "weight-loss",
            TipCategory::WeightGain => "weight-gain",
            TipCategory::HeartHealth => "heart-health",
            TipCategory::Diabetes => "diabetes",
            TipCategory::SportsNutrition => "sports-nutrition",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "general" => Some(TipCategory::General),
            "weight-loss" => Some(TipCategory::WeightLoss),
            "weight-gain" => Some(TipCategory::WeightGain),
            "heart-health" => Some(TipCategory::HeartHealth),
            "diabetes" => Some(TipCategory::Diabetes),
            "sports-nutrition" => Some(TipCategory::SportsNutrition),
            _ => None,
        }
    }
}

/// A single like on a tip; at most one per account per tip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A standalone published article by an expert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tip {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: TipCategory,
    pub expert_id: Uuid,
    pub is_published: bool,
    pub likes: Vec<Like>,
    /// Never incremented by any operation; kept for schema fidelity with
    /// earlier deployments.
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

impl Tip {
    pub fn liked_by(&self, account_id: Uuid) -> bool {
        self.likes.iter().any(|l| l.account_id == account_id)
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Adds or removes the account's like. Returns the new liked-state.
    pub fn toggle_like(&mut self, account_id: Uuid, now: DateTime<Utc>) -> bool {
        if let Some(pos) = self.likes.iter().position(|l| l.account_id == account_id) {
            self.likes.remove(pos);
            false
        } else {
            self.likes.push(Like {
                account_id,
                created_at: now,
            });
            true
        }
    }
}

/// Snapshot of an authenticated account, held for the lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn open(account: &Account, now: DateTime<Utc>) -> Self {
        Self {
            token: Uuid::new_v4(),
            account_id: account.id,
            name: account.name.clone(),
            role: account.role,
            created_at: now,
        }
    }
}
