//! Postgres implementation of the `OnboardingStore` port.
//!
//! All SQL is runtime-checked (sqlx::query, not sqlx::query!) to avoid a
//! compile-time DB requirement.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use intake_core::ports::{OnboardingStore, Result};
use intake_core::types::{
    CampaignContext, OnboardingSubmission, SubmissionDraft, STATUS_SUBMITTED, SUBMISSION_VERSION,
};
use intake_core::IntakeError;

use crate::error::classify;
use crate::sqlx_types::{
    PgContextRow, PgPersonaRow, PgSegmentRow, PgSubmissionRow, FIELD_COLUMNS, PERSONA_COLUMNS,
    SEGMENT_COLUMNS,
};
use crate::{mask_database_url, PgStoreConfig};

/// Postgres-backed onboarding store. Owns the connection pool.
#[derive(Clone)]
pub struct PgOnboardingStore {
    pool: PgPool,
}

impl PgOnboardingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized and bounded by `config`. An unreachable database
    /// is `StoreUnavailable`, so startup and readiness report it the same way.
    pub async fn connect(config: &PgStoreConfig) -> Result<Self> {
        let target = mask_database_url(&config.database_url);
        tracing::info!(%target, max_connections = config.max_connections, "Opening store pool");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                tracing::warn!(%target, error = %e, "Store pool could not connect");
                IntakeError::StoreUnavailable(format!("connect to {target}: {e}"))
            })?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn insert_submission_sql() -> String {
    let columns = format!("client_id, submission_version, submission_status, {FIELD_COLUMNS}");
    let placeholders = (1..=columns.split(',').count())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO client_onboarding_submissions ({columns}) VALUES ({placeholders}) \
         RETURNING id, client_id, submission_version, submission_status, \
                   submitted_at, created_at, {FIELD_COLUMNS}"
    )
}

#[async_trait]
impl OnboardingStore for PgOnboardingStore {
    async fn insert_submission(&self, draft: &SubmissionDraft) -> Result<OnboardingSubmission> {
        // Dropping `tx` on any early return rolls the whole write back.
        let mut tx = self.pool.begin().await.map_err(classify)?;

        // FOR SHARE keeps the client from disappearing until commit.
        let client = sqlx::query_scalar::<_, String>(
            "SELECT id FROM clients WHERE id = $1 FOR SHARE",
        )
        .bind(&draft.client_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(classify)?;
        if client.is_none() {
            return Err(IntakeError::NotFound(format!("client {}", draft.client_id)));
        }

        let f = &draft.fields;
        let sql = insert_submission_sql();
        let parent = sqlx::query_as::<_, PgSubmissionRow>(&sql)
            .bind(&draft.client_id)
            .bind(SUBMISSION_VERSION)
            .bind(STATUS_SUBMITTED)
            // foundation + offering
            .bind(&f.company.company_name)
            .bind(&f.company.website)
            .bind(&f.company.contact_name)
            .bind(&f.company.contact_email)
            .bind(&f.company.employee_count)
            .bind(&f.company.funding_stage)
            .bind(&f.company.hq_location)
            .bind(&f.company.core_product)
            .bind(&f.company.target_customer)
            .bind(&f.company.annual_revenue)
            .bind(&f.company.acv)
            .bind(&f.company.sales_cycle_length)
            .bind(&f.company.self_serve_pct)
            // market signals
            .bind(&f.market.signals)
            .bind(&f.market.signal_details)
            .bind(&f.market.custom_signals)
            .bind(&f.market.job_titles)
            // process
            .bind(&f.process.outbound_tools)
            .bind(&f.process.outbound_tools_other)
            .bind(&f.process.crm)
            .bind(&f.process.lead_sources)
            .bind(&f.process.other_channels)
            // messaging
            .bind(&f.messaging.customer_voice)
            .bind(&f.messaging.roi_results)
            .bind(&f.messaging.case_studies_description)
            .bind(Json(&f.messaging.case_studies))
            .bind(&f.messaging.tone_style)
            .bind(&f.messaging.messaging_notes)
            .bind(&f.messaging.key_differentiators)
            .bind(&f.messaging.competitors)
            // goals
            .bind(&f.goals.primary_gtm_objective)
            .bind(&f.goals.primary_gtm_objective_other)
            .bind(&f.goals.success_metrics)
            .bind(&f.goals.success_definition)
            .bind(&f.goals.timeline_urgency)
            .bind(&f.goals.monthly_budget)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify)?;

        let segment_sql = format!(
            "INSERT INTO client_segments (submission_id, segment_order, segment_name, \
                 revenue_percentage, unique_characteristics, pain_points, buying_triggers) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {SEGMENT_COLUMNS}"
        );
        let mut segments = Vec::with_capacity(draft.segments.len());
        for (idx, seg) in draft.segments.iter().enumerate() {
            let row = sqlx::query_as::<_, PgSegmentRow>(&segment_sql)
                .bind(parent.id)
                .bind(idx as i32)
                .bind(&seg.segment_name)
                .bind(seg.revenue_percentage)
                .bind(&seg.unique_characteristics)
                .bind(&seg.pain_points)
                .bind(&seg.buying_triggers)
                .fetch_one(&mut *tx)
                .await
                .map_err(classify)?;
            segments.push(row);
        }

        let persona_sql = format!(
            "INSERT INTO client_personas (submission_id, persona_order, job_title, \
                 primary_segment, seniority_level, pain_before_buying, aha_moment, \
                 objections, decision_criteria) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PERSONA_COLUMNS}"
        );
        let mut personas = Vec::with_capacity(draft.personas.len());
        for (idx, persona) in draft.personas.iter().enumerate() {
            let row = sqlx::query_as::<_, PgPersonaRow>(&persona_sql)
                .bind(parent.id)
                .bind(idx as i32)
                .bind(&persona.job_title)
                .bind(&persona.primary_segment)
                .bind(&persona.seniority_level)
                .bind(&persona.pain_before_buying)
                .bind(&persona.aha_moment)
                .bind(&persona.objections)
                .bind(&persona.decision_criteria)
                .fetch_one(&mut *tx)
                .await
                .map_err(classify)?;
            personas.push(row);
        }

        tx.commit().await.map_err(classify)?;

        tracing::debug!(
            submission_id = %parent.id,
            segments = segments.len(),
            personas = personas.len(),
            "Committed onboarding submission"
        );
        Ok(parent.into_submission(segments, personas))
    }

    async fn find_submission(&self, id: Uuid) -> Result<Option<OnboardingSubmission>> {
        let sql = format!(
            "SELECT id, client_id, submission_version, submission_status, \
                    submitted_at, created_at, {FIELD_COLUMNS} \
             FROM client_onboarding_submissions WHERE id = $1"
        );
        let Some(parent) = sqlx::query_as::<_, PgSubmissionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
        else {
            return Ok(None);
        };

        let segments = sqlx::query_as::<_, PgSegmentRow>(&format!(
            "SELECT {SEGMENT_COLUMNS} FROM client_segments \
             WHERE submission_id = $1 ORDER BY segment_order"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        let personas = sqlx::query_as::<_, PgPersonaRow>(&format!(
            "SELECT {PERSONA_COLUMNS} FROM client_personas \
             WHERE submission_id = $1 ORDER BY persona_order"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(Some(parent.into_submission(segments, personas)))
    }

    async fn latest_context(&self, client_id: &str) -> Result<Option<CampaignContext>> {
        let sql = format!(
            "SELECT client_id, client_name, submission_id, submitted_at, {FIELD_COLUMNS}, \
                    segments, personas \
             FROM client_campaign_context \
             WHERE client_id = $1 \
             ORDER BY submitted_at DESC, created_at DESC \
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, PgContextRow>(&sql)
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Into::into))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}
