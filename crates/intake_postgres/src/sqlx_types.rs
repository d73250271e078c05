//! Row types decoded by sqlx and their conversion into core domain types.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use intake_core::types::{
    CampaignContext, CompanyProfile, Goals, MarketSignals, Messaging, OnboardingSubmission,
    Persona, PersonaFields, SalesProcess, Segment, SegmentFields, SubmissionFields,
};

/// Form columns shared by the submissions table and the context view.
pub(crate) const FIELD_COLUMNS: &str = "company_name, website, contact_name, contact_email, \
    employee_count, funding_stage, hq_location, \
    core_product, target_customer, annual_revenue, acv, sales_cycle_length, self_serve_pct, \
    signals, signal_details, custom_signals, job_titles, \
    outbound_tools, outbound_tools_other, crm, lead_sources, other_channels, \
    customer_voice, roi_results, case_studies_description, case_studies, \
    tone_style, messaging_notes, key_differentiators, competitors, \
    primary_gtm_objective, primary_gtm_objective_other, success_metrics, \
    success_definition, timeline_urgency, monthly_budget";

pub(crate) const SEGMENT_COLUMNS: &str = "id, submission_id, segment_order, segment_name, \
    revenue_percentage, unique_characteristics, pain_points, buying_triggers, created_at";

pub(crate) const PERSONA_COLUMNS: &str = "id, submission_id, persona_order, job_title, \
    primary_segment, seniority_level, pain_before_buying, aha_moment, objections, \
    decision_criteria, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PgFieldsRow {
    pub company_name: String,
    pub website: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub employee_count: Option<String>,
    pub funding_stage: Option<String>,
    pub hq_location: Option<String>,
    pub core_product: String,
    pub target_customer: Option<String>,
    pub annual_revenue: Option<String>,
    pub acv: Option<String>,
    pub sales_cycle_length: Option<String>,
    pub self_serve_pct: Option<String>,
    pub signals: Vec<String>,
    pub signal_details: Option<serde_json::Value>,
    pub custom_signals: Vec<String>,
    pub job_titles: Vec<String>,
    pub outbound_tools: Vec<String>,
    pub outbound_tools_other: Option<String>,
    pub crm: Option<String>,
    pub lead_sources: Vec<String>,
    pub other_channels: Vec<String>,
    pub customer_voice: Option<String>,
    pub roi_results: Option<String>,
    pub case_studies_description: Option<String>,
    pub case_studies: Json<Vec<serde_json::Value>>,
    pub tone_style: Option<String>,
    pub messaging_notes: Option<String>,
    pub key_differentiators: Vec<String>,
    pub competitors: Vec<String>,
    pub primary_gtm_objective: Option<String>,
    pub primary_gtm_objective_other: Option<String>,
    pub success_metrics: Vec<String>,
    pub success_definition: Option<String>,
    pub timeline_urgency: Option<String>,
    pub monthly_budget: Option<String>,
}

impl From<PgFieldsRow> for SubmissionFields {
    fn from(r: PgFieldsRow) -> Self {
        Self {
            company: CompanyProfile {
                company_name: r.company_name,
                website: r.website,
                contact_name: r.contact_name,
                contact_email: r.contact_email,
                employee_count: r.employee_count,
                funding_stage: r.funding_stage,
                hq_location: r.hq_location,
                core_product: r.core_product,
                target_customer: r.target_customer,
                annual_revenue: r.annual_revenue,
                acv: r.acv,
                sales_cycle_length: r.sales_cycle_length,
                self_serve_pct: r.self_serve_pct,
            },
            market: MarketSignals {
                signals: r.signals,
                signal_details: r.signal_details,
                custom_signals: r.custom_signals,
                job_titles: r.job_titles,
            },
            process: SalesProcess {
                outbound_tools: r.outbound_tools,
                outbound_tools_other: r.outbound_tools_other,
                crm: r.crm,
                lead_sources: r.lead_sources,
                other_channels: r.other_channels,
            },
            messaging: Messaging {
                customer_voice: r.customer_voice,
                roi_results: r.roi_results,
                case_studies_description: r.case_studies_description,
                case_studies: r.case_studies.0,
                tone_style: r.tone_style,
                messaging_notes: r.messaging_notes,
                key_differentiators: r.key_differentiators,
                competitors: r.competitors,
            },
            goals: Goals {
                primary_gtm_objective: r.primary_gtm_objective,
                primary_gtm_objective_other: r.primary_gtm_objective_other,
                success_metrics: r.success_metrics,
                success_definition: r.success_definition,
                timeline_urgency: r.timeline_urgency,
                monthly_budget: r.monthly_budget,
            },
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PgSubmissionRow {
    pub id: Uuid,
    pub client_id: String,
    pub submission_version: i32,
    pub submission_status: String,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub fields: PgFieldsRow,
}

impl PgSubmissionRow {
    pub fn into_submission(
        self,
        segments: Vec<PgSegmentRow>,
        personas: Vec<PgPersonaRow>,
    ) -> OnboardingSubmission {
        OnboardingSubmission {
            id: self.id,
            client_id: self.client_id,
            submission_version: self.submission_version,
            submission_status: self.submission_status,
            fields: self.fields.into(),
            segments: segments.into_iter().map(Into::into).collect(),
            personas: personas.into_iter().map(Into::into).collect(),
            submitted_at: self.submitted_at,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PgSegmentRow {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub segment_order: i32,
    pub segment_name: String,
    pub revenue_percentage: Option<i32>,
    pub unique_characteristics: Option<String>,
    pub pain_points: Option<String>,
    pub buying_triggers: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PgSegmentRow> for Segment {
    fn from(r: PgSegmentRow) -> Self {
        Self {
            id: r.id,
            submission_id: r.submission_id,
            segment_order: r.segment_order,
            fields: SegmentFields {
                segment_name: r.segment_name,
                revenue_percentage: r.revenue_percentage,
                unique_characteristics: r.unique_characteristics,
                pain_points: r.pain_points,
                buying_triggers: r.buying_triggers,
            },
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PgPersonaRow {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub persona_order: i32,
    pub job_title: String,
    pub primary_segment: Option<String>,
    pub seniority_level: Option<String>,
    pub pain_before_buying: Option<String>,
    pub aha_moment: Option<String>,
    pub objections: Option<String>,
    pub decision_criteria: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PgPersonaRow> for Persona {
    fn from(r: PgPersonaRow) -> Self {
        Self {
            id: r.id,
            submission_id: r.submission_id,
            persona_order: r.persona_order,
            fields: PersonaFields {
                job_title: r.job_title,
                primary_segment: r.primary_segment,
                seniority_level: r.seniority_level,
                pain_before_buying: r.pain_before_buying,
                aha_moment: r.aha_moment,
                objections: r.objections,
                decision_criteria: r.decision_criteria,
            },
            created_at: r.created_at,
        }
    }
}

/// One row of the `client_campaign_context` view.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PgContextRow {
    pub client_id: String,
    pub client_name: String,
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub fields: PgFieldsRow,
    pub segments: Json<Vec<SegmentFields>>,
    pub personas: Json<Vec<PersonaFields>>,
}

impl From<PgContextRow> for CampaignContext {
    fn from(r: PgContextRow) -> Self {
        Self {
            client_id: r.client_id,
            client_name: r.client_name,
            submission_id: r.submission_id,
            submitted_at: r.submitted_at,
            fields: r.fields.into(),
            segments: r.segments.0,
            personas: r.personas.0,
        }
    }
}
