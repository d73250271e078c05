//! OnboardingService: the submission writer and context reader.
//!
//! Holds the store port as `Arc<dyn OnboardingStore>` so the same logic runs
//! against Postgres in production and [`crate::memory::MemoryStore`] in
//! tests. Every store call is bounded by `store_timeout`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use uuid::Uuid;

use crate::error::IntakeError;
use crate::ports::{OnboardingStore, Result};
use crate::types::{CampaignContext, OnboardingSubmission, SubmissionDraft};
use crate::validate::parse_submission;

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct OnboardingService {
    store: Arc<dyn OnboardingStore>,
    store_timeout: Duration,
}

impl OnboardingService {
    pub fn new(store: Arc<dyn OnboardingStore>) -> Self {
        Self {
            store,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Set the per-call store timeout (builder pattern).
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Validate a raw form payload and persist it.
    pub async fn submit(&self, body: &Value) -> Result<OnboardingSubmission> {
        let draft = parse_submission(body)?;
        self.submit_draft(&draft).await
    }

    pub async fn submit_draft(&self, draft: &SubmissionDraft) -> Result<OnboardingSubmission> {
        let stored = self
            .bounded("insert_submission", self.store.insert_submission(draft))
            .await?;

        // A successful write must echo back every child that was sent.
        if stored.segments.len() != draft.segments.len()
            || stored.personas.len() != draft.personas.len()
        {
            return Err(IntakeError::Integrity(format!(
                "submission {} stored {}/{} segments and {}/{} personas",
                stored.id,
                stored.segments.len(),
                draft.segments.len(),
                stored.personas.len(),
                draft.personas.len()
            )));
        }

        tracing::info!(
            submission_id = %stored.id,
            client_id = %stored.client_id,
            segments = stored.segments.len(),
            personas = stored.personas.len(),
            "Onboarding submission saved"
        );
        Ok(stored)
    }

    /// Look up a submission by id. Ids that are not UUIDs cannot exist and
    /// are reported as not found.
    pub async fn get_submission(&self, raw_id: &str) -> Result<OnboardingSubmission> {
        let not_found = || IntakeError::NotFound(format!("submission {raw_id}"));
        let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
        self.bounded("find_submission", self.store.find_submission(id))
            .await?
            .ok_or_else(not_found)
    }

    /// Campaign context of the client's most recent submission.
    pub async fn campaign_context(&self, client_id: &str) -> Result<CampaignContext> {
        self.bounded("latest_context", self.store.latest_context(client_id))
            .await?
            .ok_or_else(|| {
                IntakeError::NotFound(format!("onboarding context for client {client_id}"))
            })
    }

    pub async fn check_store(&self) -> Result<()> {
        self.bounded("ping", self.store.ping()).await
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    op,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(IntakeError::StoreUnavailable(format!(
                    "{op} timed out after {}ms",
                    self.store_timeout.as_millis()
                )))
            }
        }
    }
}
