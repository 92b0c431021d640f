//! Workflow services for NutriHub.
//!
//! Each service takes the authenticated actor as an explicit parameter;
//! nothing here reads ambient session state. Persistence is reached
//! only through the port traits defined in `domains`.

pub mod accounts;
pub mod feedback;
pub mod lock;
pub mod queries;
pub mod tips;

pub use accounts::{AccountService, ProfileOverview};
pub use feedback::{FeedbackService, FeedbackView, SubmitFeedback};
pub use lock::KeyedLock;
pub use queries::{
    ExpertQueryView, QueryDetail, QueryService, SolutionView, SolutionWithQuery, SubmissionState,
};
pub use tips::{LikeOutcome, TipService, TipView};
