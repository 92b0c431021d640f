//! Tip/Like workflow: publishing, status toggling, deletion, and the
//! per-account like toggle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    AccountStore, DomainError, DomainResult, Tip, TipCategory, TipStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::lock::KeyedLock;
use crate::queries::NameCache;

/// Result of a like toggle.
#[derive(Debug, Clone, Serialize)]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: usize,
}

/// A published tip annotated for the requesting viewer.
#[derive(Debug, Clone, Serialize)]
pub struct TipView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: TipCategory,
    pub expert_name: String,
    pub like_count: usize,
    pub liked_by_viewer: bool,
    pub created_at: DateTime<Utc>,
}

pub struct TipService {
    tips: Arc<dyn TipStore>,
    accounts: Arc<dyn AccountStore>,
    locks: Arc<KeyedLock>,
}

impl TipService {
    pub fn new(
        tips: Arc<dyn TipStore>,
        accounts: Arc<dyn AccountStore>,
        locks: Arc<KeyedLock>,
    ) -> Self {
        Self {
            tips,
            accounts,
            locks,
        }
    }

    /// Publishes a tip. An omitted or empty category falls back to
    /// General; an unknown non-empty category is rejected here rather
    /// than left to the storage layer.
    #[tracing::instrument(skip_all, fields(expert = %expert))]
    pub async fn publish_tip(
        &self,
        expert: Uuid,
        title: &str,
        content: &str,
        category: Option<&str>,
    ) -> DomainResult<Tip> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("title required".into()));
        }
        if content.is_empty() {
            return Err(DomainError::Validation("content required".into()));
        }
        let category = match category.map(str::trim) {
            None | Some("") => TipCategory::General,
            Some(raw) => TipCategory::parse(raw)
                .ok_or_else(|| DomainError::Validation(format!("unknown category: {raw}")))?,
        };

        let tip = Tip {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            category,
            expert_id: expert,
            is_published: true,
            likes: vec![],
            views: 0,
            created_at: Utc::now(),
        };
        self.tips.insert(tip.clone()).await?;
        tracing::info!(tip_id = %tip.id, category = category.as_str(), "tip published");
        Ok(tip)
    }

    /// Flips the published flag on an owned tip. No timestamp bookkeeping.
    #[tracing::instrument(skip_all, fields(expert = %expert, tip_id = %tip_id))]
    pub async fn toggle_tip_status(&self, expert: Uuid, tip_id: Uuid) -> DomainResult<Tip> {
        let mut tip = self.owned_tip(expert, tip_id).await?;
        tip.is_published = !tip.is_published;
        self.tips.update(&tip).await?;
        Ok(tip)
    }

    /// Permanently removes an owned tip and its likes.
    #[tracing::instrument(skip_all, fields(expert = %expert, tip_id = %tip_id))]
    pub async fn delete_tip(&self, expert: Uuid, tip_id: Uuid) -> DomainResult<()> {
        self.owned_tip(expert, tip_id).await?;
        self.tips.delete(tip_id).await?;
        tracing::info!("tip deleted");
        Ok(())
    }

    /// Likes or unlikes a tip for the account.
    ///
    /// The read-modify-write on the like collection runs under a keyed
    /// mutex per (account, tip) so two concurrent toggles from the same
    /// account cannot double-apply.
    #[tracing::instrument(skip_all, fields(account = %account, tip_id = %tip_id))]
    pub async fn toggle_like(&self, account: Uuid, tip_id: Uuid) -> DomainResult<LikeOutcome> {
        let lock_key = format!("like:{account}:{tip_id}");
        let _guard = self.locks.acquire(&lock_key).await;

        let mut tip = self
            .tips
            .find_by_id(tip_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tip", tip_id))?;
        let liked = tip.toggle_like(account, Utc::now());
        self.tips.update(&tip).await?;
        Ok(LikeOutcome {
            liked,
            like_count: tip.like_count(),
        })
    }

    /// Published tips, newest first, annotated with the viewer's
    /// liked-state. An anonymous viewer sees everything unliked.
    pub async fn list_published(&self, viewer: Option<Uuid>) -> DomainResult<Vec<TipView>> {
        let tips = self.tips.list_published().await?;
        let mut names = NameCache::new(self.accounts.clone());
        let mut views = Vec::with_capacity(tips.len());
        for tip in tips {
            let expert_name = names.get(tip.expert_id).await?;
            let liked_by_viewer = viewer.map(|v| tip.liked_by(v)).unwrap_or(false);
            views.push(TipView {
                id: tip.id,
                title: tip.title,
                content: tip.content,
                category: tip.category,
                expert_name,
                like_count: tip.likes.len(),
                liked_by_viewer,
                created_at: tip.created_at,
            });
        }
        Ok(views)
    }

    /// The expert's own tips, drafts included, newest first.
    pub async fn tips_for_expert(&self, expert: Uuid) -> DomainResult<Vec<Tip>> {
        self.tips.list_by_expert(expert).await
    }

    async fn owned_tip(&self, expert: Uuid, tip_id: Uuid) -> DomainResult<Tip> {
        let tip = self
            .tips
            .find_by_id(tip_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tip", tip_id))?;
        if tip.expert_id != expert {
            return Err(DomainError::Unauthorized(
                "tip belongs to another expert".into(),
            ));
        }
        Ok(tip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::ports::{MockAccountStore, MockTipStore};
    use domains::Like;

    fn service(tips: MockTipStore) -> TipService {
        TipService::new(
            Arc::new(tips),
            Arc::new(MockAccountStore::new()),
            Arc::new(KeyedLock::new()),
        )
    }

    fn tip_owned_by(expert: Uuid) -> Tip {
        Tip {
            id: Uuid::new_v4(),
            title: "Hydration".into(),
            content: "Drink water.".into(),
            category: TipCategory::General,
            expert_id: expert,
            is_published: true,
            likes: vec![],
            views: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_defaults_category_to_general() {
        let mut tips = MockTipStore::new();
        tips.expect_insert()
            .withf(|t| t.category == TipCategory::General && t.is_published)
            .returning(|_| Ok(()));
        let svc = service(tips);
        let tip = svc
            .publish_tip(Uuid::new_v4(), "Hydration", "Drink water.", None)
            .await
            .unwrap();
        assert_eq!(tip.category, TipCategory::General);

        // Empty string behaves like omission.
        let mut tips = MockTipStore::new();
        tips.expect_insert().returning(|_| Ok(()));
        let svc = service(tips);
        let tip = svc
            .publish_tip(Uuid::new_v4(), "Hydration", "Drink water.", Some(""))
            .await
            .unwrap();
        assert_eq!(tip.category, TipCategory::General);
    }

    #[tokio::test]
    async fn publish_rejects_unknown_category() {
        let svc = service(MockTipStore::new());
        let err = svc
            .publish_tip(Uuid::new_v4(), "Keto", "content", Some("keto"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn toggle_status_rejects_foreign_tip() {
        let tip = tip_owned_by(Uuid::new_v4());
        let mut tips = MockTipStore::new();
        tips.expect_find_by_id()
            .returning(move |_| Ok(Some(tip.clone())));
        let svc = service(tips);
        let err = svc
            .toggle_tip_status(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn like_then_unlike_restores_initial_state() {
        let expert = Uuid::new_v4();
        let user = Uuid::new_v4();
        let tip = tip_owned_by(expert);
        let tid = tip.id;

        // First toggle on an unliked tip.
        let mut tips = MockTipStore::new();
        let snapshot = tip.clone();
        tips.expect_find_by_id()
            .returning(move |_| Ok(Some(snapshot.clone())));
        tips.expect_update()
            .withf(move |t| t.like_count() == 1 && t.liked_by(user))
            .returning(|_| Ok(()));
        let svc = service(tips);
        let out = svc.toggle_like(user, tid).await.unwrap();
        assert!(out.liked);
        assert_eq!(out.like_count, 1);

        // Second toggle against the liked snapshot.
        let mut liked_tip = tip.clone();
        liked_tip.likes.push(Like {
            account_id: user,
            created_at: Utc::now(),
        });
        let mut tips = MockTipStore::new();
        tips.expect_find_by_id()
            .returning(move |_| Ok(Some(liked_tip.clone())));
        tips.expect_update()
            .withf(|t| t.like_count() == 0)
            .returning(|_| Ok(()));
        let svc = service(tips);
        let out = svc.toggle_like(user, tid).await.unwrap();
        assert!(!out.liked);
        assert_eq!(out.like_count, 0);
    }

    #[tokio::test]
    async fn toggle_like_unknown_tip_is_not_found() {
        let mut tips = MockTipStore::new();
        tips.expect_find_by_id().returning(|_| Ok(None));
        let svc = service(tips);
        let err = svc
            .toggle_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_, _)));
    }

    #[tokio::test]
    async fn anonymous_viewer_sees_tips_unliked() {
        let expert = Uuid::new_v4();
        let mut tip = tip_owned_by(expert);
        tip.likes.push(Like {
            account_id: Uuid::new_v4(),
            created_at: Utc::now(),
        });

        let mut tips = MockTipStore::new();
        let snapshot = tip.clone();
        tips.expect_list_published()
            .returning(move || Ok(vec![snapshot.clone()]));
        let mut accounts = MockAccountStore::new();
        accounts.expect_find_by_id().returning(|id| {
            Ok(Some(domains::Account {
                id,
                name: "Elena".into(),
                email: "elena@example.com".into(),
                password_hash: "h".into(),
                role: domains::Role::Expert,
                created_at: Utc::now(),
            }))
        });

        let svc = TipService::new(
            Arc::new(tips),
            Arc::new(accounts),
            Arc::new(KeyedLock::new()),
        );
        let views = svc.list_published(None).await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(!views[0].liked_by_viewer);
        assert_eq!(views[0].like_count, 1);
        assert_eq!(views[0].expert_name, "Elena");
    }
}
