//! Store port. Implemented by `intake_postgres::PgOnboardingStore` and by
//! [`crate::memory::MemoryStore`] for tests and local runs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::IntakeError;
use crate::types::{CampaignContext, OnboardingSubmission, SubmissionDraft};

pub type Result<T> = std::result::Result<T, IntakeError>;

#[async_trait]
pub trait OnboardingStore: Send + Sync {
    /// Write the submission and all of its segments and personas as one
    /// atomic unit. Fails with `NotFound` when the client does not exist;
    /// on any failure nothing is left behind.
    async fn insert_submission(&self, draft: &SubmissionDraft) -> Result<OnboardingSubmission>;

    /// Load a submission with its children in submitted order.
    async fn find_submission(&self, id: Uuid) -> Result<Option<OnboardingSubmission>>;

    /// Most recent submission of a client, projected as a campaign context.
    async fn latest_context(&self, client_id: &str) -> Result<Option<CampaignContext>>;

    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> Result<()>;
}
