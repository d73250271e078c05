//! In-memory [`OnboardingStore`].
//!
//! Writes are staged and only published under a single write lock, which
//! gives the same all-or-nothing visibility as the Postgres transaction.
//! Failure injection and latency knobs exist so the service and HTTP
//! layers can be exercised without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::IntakeError;
use crate::ports::{OnboardingStore, Result};
use crate::types::{
    CampaignContext, OnboardingSubmission, Persona, Segment, SubmissionDraft, STATUS_SUBMITTED,
    SUBMISSION_VERSION,
};

#[derive(Default)]
struct State {
    clients: HashMap<String, String>,
    submissions: HashMap<Uuid, OnboardingSubmission>,
    /// Insertion order, used to break `submitted_at` ties.
    order: Vec<Uuid>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    fail_after_parent: AtomicBool,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed a client.
    pub fn with_client(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.state.get_mut().clients.insert(id.into(), name.into());
        self
    }

    /// Builder: delay every call, to exercise store timeouts.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn add_client(&self, id: impl Into<String>, name: impl Into<String>) {
        self.state.write().await.clients.insert(id.into(), name.into());
    }

    /// Make the next insert fail after the parent row is staged.
    pub fn fail_next_insert_after_parent(&self) {
        self.fail_after_parent.store(true, Ordering::SeqCst);
    }

    /// Simulate a lost connection for every call until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn submission_count(&self) -> usize {
        self.state.read().await.submissions.len()
    }

    async fn enter(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(IntakeError::StoreUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl OnboardingStore for MemoryStore {
    async fn insert_submission(&self, draft: &SubmissionDraft) -> Result<OnboardingSubmission> {
        self.enter().await?;
        let mut state = self.state.write().await;

        if !state.clients.contains_key(&draft.client_id) {
            return Err(IntakeError::NotFound(format!("client {}", draft.client_id)));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut staged = OnboardingSubmission {
            id,
            client_id: draft.client_id.clone(),
            submission_version: SUBMISSION_VERSION,
            submission_status: STATUS_SUBMITTED.to_string(),
            fields: draft.fields.clone(),
            segments: Vec::with_capacity(draft.segments.len()),
            personas: Vec::with_capacity(draft.personas.len()),
            submitted_at: now,
            created_at: now,
        };

        if self.fail_after_parent.swap(false, Ordering::SeqCst) {
            return Err(IntakeError::StoreUnavailable(
                "write aborted after parent insert".into(),
            ));
        }

        for (idx, fields) in draft.segments.iter().enumerate() {
            staged.segments.push(Segment {
                id: Uuid::new_v4(),
                submission_id: id,
                segment_order: idx as i32,
                fields: fields.clone(),
                created_at: now,
            });
        }
        for (idx, fields) in draft.personas.iter().enumerate() {
            staged.personas.push(Persona {
                id: Uuid::new_v4(),
                submission_id: id,
                persona_order: idx as i32,
                fields: fields.clone(),
                created_at: now,
            });
        }

        state.submissions.insert(id, staged.clone());
        state.order.push(id);
        Ok(staged)
    }

    async fn find_submission(&self, id: Uuid) -> Result<Option<OnboardingSubmission>> {
        self.enter().await?;
        Ok(self.state.read().await.submissions.get(&id).cloned())
    }

    async fn latest_context(&self, client_id: &str) -> Result<Option<CampaignContext>> {
        self.enter().await?;
        let state = self.state.read().await;
        let Some(client_name) = state.clients.get(client_id) else {
            return Ok(None);
        };
        let latest = state
            .order
            .iter()
            .enumerate()
            .filter_map(|(pos, id)| state.submissions.get(id).map(|s| (pos, s)))
            .filter(|(_, s)| s.client_id == client_id)
            .max_by_key(|(pos, s)| (s.submitted_at, *pos))
            .map(|(_, s)| CampaignContext::from_submission(client_name.clone(), s));
        Ok(latest)
    }

    async fn ping(&self) -> Result<()> {
        self.enter().await
    }
}
