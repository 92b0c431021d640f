//! Query/Solution workflow: query creation, solution attachment, and the
//! draft/submitted state machine.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    AccountStore, DomainError, DomainResult, Query, QueryStore, Solution, SolutionStore,
};
use serde::Serialize;
use uuid::Uuid;

/// Result of a submission toggle: the new flag plus the (first) submission
/// timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionState {
    pub is_submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A query as seen on the expert dashboard: only the calling expert's own
/// solutions are attached.
#[derive(Debug, Clone, Serialize)]
pub struct ExpertQueryView {
    pub query: Query,
    pub author_name: String,
    pub my_solutions: Vec<Solution>,
}

/// A solution flattened together with the query it answers.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionWithQuery {
    pub solution: Solution,
    pub expert_name: String,
    pub query_title: String,
}

/// A fully populated query page.
#[derive(Debug, Clone, Serialize)]
pub struct QueryDetail {
    pub query: Query,
    pub author_name: String,
    pub solutions: Vec<SolutionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolutionView {
    pub solution: Solution,
    pub expert_name: String,
}

pub struct QueryService {
    queries: Arc<dyn QueryStore>,
    solutions: Arc<dyn SolutionStore>,
    accounts: Arc<dyn AccountStore>,
}

impl QueryService {
    pub fn new(
        queries: Arc<dyn QueryStore>,
        solutions: Arc<dyn SolutionStore>,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            queries,
            solutions,
            accounts,
        }
    }

    /// Posts a new question with an empty solution list.
    #[tracing::instrument(skip_all, fields(author = %author))]
    pub async fn create_query(
        &self,
        author: Uuid,
        title: &str,
        description: &str,
    ) -> DomainResult<Query> {
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("title required".into()));
        }
        if description.is_empty() {
            return Err(DomainError::Validation("description required".into()));
        }
        let query = Query {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            posted_by: author,
            solution_ids: vec![],
            created_at: Utc::now(),
        };
        self.queries.insert(query.clone()).await?;
        tracing::info!(query_id = %query.id, "query posted");
        Ok(query)
    }

    /// Creates a draft solution and links it to the query.
    ///
    /// The solution insert and the list append are two separate writes;
    /// a crash in between leaves a solution that is not linked to its
    /// query. An expert may hold multiple solutions for the same query.
    #[tracing::instrument(skip_all, fields(expert = %expert, query_id = %query_id))]
    pub async fn attach_solution(
        &self,
        expert: Uuid,
        query_id: Uuid,
        content: &str,
    ) -> DomainResult<Solution> {
        let query = self
            .queries
            .find_by_id(query_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Query", query_id))?;
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation("content required".into()));
        }
        let solution = Solution::new(query.id, expert, content.to_string(), Utc::now());
        self.solutions.insert(solution.clone()).await?;
        self.queries.append_solution(query.id, solution.id).await?;
        tracing::info!(solution_id = %solution.id, "draft solution attached");
        Ok(solution)
    }

    /// Flips a solution between draft and submitted.
    #[tracing::instrument(skip_all, fields(expert = %expert, solution_id = %solution_id))]
    pub async fn toggle_submission(
        &self,
        expert: Uuid,
        solution_id: Uuid,
    ) -> DomainResult<SubmissionState> {
        let mut solution = self.owned_solution(expert, solution_id).await?;
        solution.toggle_submission(Utc::now());
        self.solutions.update(&solution).await?;
        Ok(SubmissionState {
            is_submitted: solution.is_submitted,
            submitted_at: solution.submitted_at,
        })
    }

    /// Replaces a solution's content, stamping the edit time when the text
    /// actually changed.
    #[tracing::instrument(skip_all, fields(expert = %expert, solution_id = %solution_id))]
    pub async fn update_solution_content(
        &self,
        expert: Uuid,
        solution_id: Uuid,
        content: &str,
    ) -> DomainResult<Solution> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation("content required".into()));
        }
        let mut solution = self.owned_solution(expert, solution_id).await?;
        solution.set_content(content.to_string(), Utc::now());
        self.solutions.update(&solution).await?;
        Ok(solution)
    }

    /// Fetches an owned solution for the edit form.
    pub async fn solution_for_edit(
        &self,
        expert: Uuid,
        solution_id: Uuid,
    ) -> DomainResult<Solution> {
        self.owned_solution(expert, solution_id).await
    }

    /// All queries, newest first, each populated only with the calling
    /// expert's solutions so submission state is visible per query.
    pub async fn list_for_expert(&self, expert: Uuid) -> DomainResult<Vec<ExpertQueryView>> {
        let queries = self.queries.list_all().await?;
        let mine = self.solutions.list_by_expert(expert).await?;
        let mut by_query: HashMap<Uuid, Vec<Solution>> = HashMap::new();
        for s in mine {
            by_query.entry(s.query_id).or_default().push(s);
        }
        let mut names = NameCache::new(self.accounts.clone());
        let mut views = Vec::with_capacity(queries.len());
        for query in queries {
            let author_name = names.get(query.posted_by).await?;
            let mut my_solutions = by_query.remove(&query.id).unwrap_or_default();
            my_solutions.sort_by_key(|s| s.created_at);
            views.push(ExpertQueryView {
                query,
                author_name,
                my_solutions,
            });
        }
        Ok(views)
    }

    /// The user's own queries, newest first.
    pub async fn list_for_owner(&self, owner: Uuid) -> DomainResult<Vec<Query>> {
        self.queries.list_by_owner(owner).await
    }

    /// All solutions on the user's queries, flattened with query titles.
    pub async fn solutions_for_owner(&self, owner: Uuid) -> DomainResult<Vec<SolutionWithQuery>> {
        let queries = self.queries.list_by_owner(owner).await?;
        let mut names = NameCache::new(self.accounts.clone());
        let mut out = Vec::new();
        for query in queries {
            for solution in self.solutions.list_by_query(query.id).await? {
                let expert_name = names.get(solution.expert_id).await?;
                out.push(SolutionWithQuery {
                    solution,
                    expert_name,
                    query_title: query.title.clone(),
                });
            }
        }
        Ok(out)
    }

    /// One expert's solutions with the titles of the queries they answer,
    /// newest first.
    pub async fn solutions_by_expert(&self, expert: Uuid) -> DomainResult<Vec<SolutionWithQuery>> {
        let solutions = self.solutions.list_by_expert(expert).await?;
        let mut names = NameCache::new(self.accounts.clone());
        let expert_name = names.get(expert).await?;
        let mut out = Vec::with_capacity(solutions.len());
        for solution in solutions {
            let query_title = match self.queries.find_by_id(solution.query_id).await? {
                Some(q) => q.title,
                None => String::new(),
            };
            out.push(SolutionWithQuery {
                solution,
                expert_name: expert_name.clone(),
                query_title,
            });
        }
        Ok(out)
    }

    /// A query with its solutions and author names populated.
    pub async fn query_detail(&self, query_id: Uuid) -> DomainResult<QueryDetail> {
        let query = self
            .queries
            .find_by_id(query_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Query", query_id))?;
        let mut names = NameCache::new(self.accounts.clone());
        let author_name = names.get(query.posted_by).await?;
        let mut solutions = Vec::new();
        for solution in self.solutions.list_by_query(query.id).await? {
            let expert_name = names.get(solution.expert_id).await?;
            solutions.push(SolutionView {
                solution,
                expert_name,
            });
        }
        Ok(QueryDetail {
            query,
            author_name,
            solutions,
        })
    }

    /// Resolves a solution the expert owns. Absent id is NotFound; a
    /// solution owned by someone else is Unauthorized.
    async fn owned_solution(&self, expert: Uuid, solution_id: Uuid) -> DomainResult<Solution> {
        let solution = self
            .solutions
            .find_by_id(solution_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Solution", solution_id))?;
        if solution.expert_id != expert {
            return Err(DomainError::Unauthorized(
                "solution belongs to another expert".into(),
            ));
        }
        Ok(solution)
    }
}

/// Memoizes account-id → display-name lookups within one request.
pub(crate) struct NameCache {
    accounts: Arc<dyn AccountStore>,
    cache: HashMap<Uuid, String>,
}

impl NameCache {
    pub(crate) fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            accounts,
            cache: HashMap::new(),
        }
    }

    pub(crate) async fn get(&mut self, id: Uuid) -> DomainResult<String> {
        if let Some(name) = self.cache.get(&id) {
            return Ok(name.clone());
        }
        let name = self
            .accounts
            .find_by_id(id)
            .await?
            .map(|a| a.name)
            .unwrap_or_default();
        self.cache.insert(id, name.clone());
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::ports::{MockAccountStore, MockQueryStore, MockSolutionStore};
    use domains::Role;

    fn query_owned_by(owner: Uuid) -> Query {
        Query {
            id: Uuid::new_v4(),
            title: "Low sodium diet?".into(),
            description: "How low should I go?".into(),
            posted_by: owner,
            solution_ids: vec![],
            created_at: Utc::now(),
        }
    }

    fn service(
        queries: MockQueryStore,
        solutions: MockSolutionStore,
        accounts: MockAccountStore,
    ) -> QueryService {
        QueryService::new(Arc::new(queries), Arc::new(solutions), Arc::new(accounts))
    }

    #[tokio::test]
    async fn create_query_rejects_whitespace_title() {
        let svc = service(
            MockQueryStore::new(),
            MockSolutionStore::new(),
            MockAccountStore::new(),
        );
        let err = svc
            .create_query(Uuid::new_v4(), "   ", "desc")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_query_trims_and_persists() {
        let mut queries = MockQueryStore::new();
        queries
            .expect_insert()
            .withf(|q| q.title == "Low sodium diet?" && q.solution_ids.is_empty())
            .returning(|_| Ok(()));
        let svc = service(queries, MockSolutionStore::new(), MockAccountStore::new());
        let q = svc
            .create_query(Uuid::new_v4(), "  Low sodium diet?  ", " details ")
            .await
            .unwrap();
        assert_eq!(q.description, "details");
    }

    #[tokio::test]
    async fn attach_solution_requires_existing_query() {
        let mut queries = MockQueryStore::new();
        queries.expect_find_by_id().returning(|_| Ok(None));
        let svc = service(queries, MockSolutionStore::new(), MockAccountStore::new());
        let err = svc
            .attach_solution(Uuid::new_v4(), Uuid::new_v4(), "answer")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_, _)));
    }

    #[tokio::test]
    async fn attach_solution_creates_draft_and_links() {
        let owner = Uuid::new_v4();
        let q = query_owned_by(owner);
        let q_id = q.id;

        let mut queries = MockQueryStore::new();
        let q2 = q.clone();
        queries
            .expect_find_by_id()
            .returning(move |_| Ok(Some(q2.clone())));
        queries
            .expect_append_solution()
            .withf(move |qid, _| *qid == q_id)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut solutions = MockSolutionStore::new();
        solutions
            .expect_insert()
            .withf(|s| !s.is_submitted && s.submitted_at.is_none())
            .returning(|_| Ok(()));

        let svc = service(queries, solutions, MockAccountStore::new());
        let s = svc
            .attach_solution(Uuid::new_v4(), q_id, "Reduce to 1500mg/day")
            .await
            .unwrap();
        assert!(!s.is_submitted);
        assert_eq!(s.query_id, q_id);
    }

    #[tokio::test]
    async fn toggle_submission_rejects_foreign_solution() {
        let foreign = Solution::new(Uuid::new_v4(), Uuid::new_v4(), "x".into(), Utc::now());
        let mut solutions = MockSolutionStore::new();
        solutions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(foreign.clone())));
        let svc = service(MockQueryStore::new(), solutions, MockAccountStore::new());
        let err = svc
            .toggle_submission(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn toggle_submission_round_trip_preserves_timestamp() {
        let expert = Uuid::new_v4();
        let mut current = Solution::new(Uuid::new_v4(), expert, "x".into(), Utc::now());
        let sid = current.id;

        // First toggle: draft → submitted, timestamp set.
        let mut solutions = MockSolutionStore::new();
        let snapshot = current.clone();
        solutions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(snapshot.clone())));
        solutions
            .expect_update()
            .withf(|s| s.is_submitted && s.submitted_at.is_some())
            .returning(|_| Ok(()));
        let svc = service(MockQueryStore::new(), solutions, MockAccountStore::new());
        let state = svc.toggle_submission(expert, sid).await.unwrap();
        assert!(state.is_submitted);
        let t1 = state.submitted_at.unwrap();

        // Second toggle against the submitted snapshot: flag off,
        // timestamp untouched.
        current.is_submitted = true;
        current.submitted_at = Some(t1);
        let mut solutions = MockSolutionStore::new();
        let snapshot = current.clone();
        solutions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(snapshot.clone())));
        solutions
            .expect_update()
            .withf(move |s| !s.is_submitted && s.submitted_at == Some(t1))
            .returning(|_| Ok(()));
        let svc = service(MockQueryStore::new(), solutions, MockAccountStore::new());
        let state = svc.toggle_submission(expert, sid).await.unwrap();
        assert!(!state.is_submitted);
        assert_eq!(state.submitted_at, Some(t1));
    }

    #[tokio::test]
    async fn update_content_stamps_edit_time_only_on_change() {
        let expert = Uuid::new_v4();
        let existing = Solution::new(Uuid::new_v4(), expert, "same".into(), Utc::now());
        let sid = existing.id;
        let mut solutions = MockSolutionStore::new();
        let snapshot = existing.clone();
        solutions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(snapshot.clone())));
        solutions
            .expect_update()
            .withf(|s| s.last_edited_at.is_none())
            .returning(|_| Ok(()));
        let svc = service(MockQueryStore::new(), solutions, MockAccountStore::new());
        let s = svc
            .update_solution_content(expert, sid, "same")
            .await
            .unwrap();
        assert!(s.last_edited_at.is_none());
    }

    #[tokio::test]
    async fn expert_dashboard_shows_only_own_solutions() {
        let owner = Uuid::new_v4();
        let expert = Uuid::new_v4();
        let q = query_owned_by(owner);

        let mine = Solution::new(q.id, expert, "mine".into(), Utc::now());

        let mut queries = MockQueryStore::new();
        let q2 = q.clone();
        queries.expect_list_all().returning(move || Ok(vec![q2.clone()]));
        let mut solutions = MockSolutionStore::new();
        let mine2 = mine.clone();
        solutions
            .expect_list_by_expert()
            .returning(move |_| Ok(vec![mine2.clone()]));
        let mut accounts = MockAccountStore::new();
        accounts.expect_find_by_id().returning(|id| {
            Ok(Some(domains::Account {
                id,
                name: "Uma".into(),
                email: "uma@example.com".into(),
                password_hash: "h".into(),
                role: Role::User,
                created_at: Utc::now(),
            }))
        });

        let svc = service(queries, solutions, accounts);
        let views = svc.list_for_expert(expert).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].my_solutions.len(), 1);
        assert_eq!(views[0].author_name, "Uma");
    }
}
