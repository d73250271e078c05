//! Domain types for onboarding submissions.
//!
//! Field names are the wire contract shared by the HTTP payload, the
//! persisted columns and the `client_campaign_context` view. Renaming a
//! field here is a breaking change for the downstream generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SUBMISSION_VERSION: i32 = 1;
pub const STATUS_SUBMITTED: &str = "submitted";

// ── Form sections ─────────────────────────────────────────────

/// Foundation + offering sections of the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
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
    /// Accepted as integer or string on input, always stored as text.
    pub self_serve_pct: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSignals {
    pub signals: Vec<String>,
    pub signal_details: Option<serde_json::Value>,
    pub custom_signals: Vec<String>,
    pub job_titles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesProcess {
    pub outbound_tools: Vec<String>,
    pub outbound_tools_other: Option<String>,
    pub crm: Option<String>,
    pub lead_sources: Vec<String>,
    pub other_channels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Messaging {
    pub customer_voice: Option<String>,
    pub roi_results: Option<String>,
    pub case_studies_description: Option<String>,
    pub case_studies: Vec<serde_json::Value>,
    pub tone_style: Option<String>,
    pub messaging_notes: Option<String>,
    pub key_differentiators: Vec<String>,
    pub competitors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub primary_gtm_objective: Option<String>,
    pub primary_gtm_objective_other: Option<String>,
    pub success_metrics: Vec<String>,
    pub success_definition: Option<String>,
    pub timeline_urgency: Option<String>,
    pub monthly_budget: Option<String>,
}

/// All scalar and array-valued submission fields, serialized flat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionFields {
    #[serde(flatten)]
    pub company: CompanyProfile,
    #[serde(flatten)]
    pub market: MarketSignals,
    #[serde(flatten)]
    pub process: SalesProcess,
    #[serde(flatten)]
    pub messaging: Messaging,
    #[serde(flatten)]
    pub goals: Goals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentFields {
    pub segment_name: String,
    pub revenue_percentage: Option<i32>,
    pub unique_characteristics: Option<String>,
    pub pain_points: Option<String>,
    pub buying_triggers: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaFields {
    pub job_title: String,
    pub primary_segment: Option<String>,
    pub seniority_level: Option<String>,
    pub pain_before_buying: Option<String>,
    pub aha_moment: Option<String>,
    pub objections: Option<String>,
    pub decision_criteria: Option<String>,
}

// ── Write side ────────────────────────────────────────────────

/// A validated payload, ready to be written. Produced only by
/// [`crate::validate::parse_submission`] on the request path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionDraft {
    pub client_id: String,
    #[serde(flatten)]
    pub fields: SubmissionFields,
    pub segments: Vec<SegmentFields>,
    pub personas: Vec<PersonaFields>,
}

// ── Stored records ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub segment_order: i32,
    #[serde(flatten)]
    pub fields: SegmentFields,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub persona_order: i32,
    #[serde(flatten)]
    pub fields: PersonaFields,
    pub created_at: DateTime<Utc>,
}

/// A persisted submission with its owned segments and personas, in
/// submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingSubmission {
    pub id: Uuid,
    pub client_id: String,
    pub submission_version: i32,
    pub submission_status: String,
    #[serde(flatten)]
    pub fields: SubmissionFields,
    pub segments: Vec<Segment>,
    pub personas: Vec<Persona>,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// ── Read side ─────────────────────────────────────────────────

/// Denormalized projection of a client's submission for the campaign
/// generator. Mirrors the `client_campaign_context` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignContext {
    pub client_id: String,
    pub client_name: String,
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: SubmissionFields,
    pub segments: Vec<SegmentFields>,
    pub personas: Vec<PersonaFields>,
}

impl CampaignContext {
    pub fn from_submission(client_name: impl Into<String>, submission: &OnboardingSubmission) -> Self {
        Self {
            client_id: submission.client_id.clone(),
            client_name: client_name.into(),
            submission_id: submission.id,
            submitted_at: submission.submitted_at,
            fields: submission.fields.clone(),
            segments: submission.segments.iter().map(|s| s.fields.clone()).collect(),
            personas: submission.personas.iter().map(|p| p.fields.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_submission() -> OnboardingSubmission {
        let id = Uuid::new_v4();
        let now = Utc::now();
        OnboardingSubmission {
            id,
            client_id: "c1".into(),
            submission_version: SUBMISSION_VERSION,
            submission_status: STATUS_SUBMITTED.into(),
            fields: SubmissionFields {
                company: CompanyProfile {
                    company_name: "Acme".into(),
                    core_product: "Widget".into(),
                    ..Default::default()
                },
                market: MarketSignals {
                    signals: vec!["hiring".into(), "funding".into()],
                    ..Default::default()
                },
                ..Default::default()
            },
            segments: vec![Segment {
                id: Uuid::new_v4(),
                submission_id: id,
                segment_order: 0,
                fields: SegmentFields {
                    segment_name: "SMB".into(),
                    ..Default::default()
                },
                created_at: now,
            }],
            personas: vec![],
            submitted_at: now,
            created_at: now,
        }
    }

    #[test]
    fn submission_serializes_flat_with_nested_children() {
        let json = serde_json::to_value(sample_submission()).unwrap();
        assert_eq!(json["company_name"], "Acme");
        assert_eq!(json["signals"][1], "funding");
        assert_eq!(json["segments"][0]["segment_name"], "SMB");
        assert_eq!(json["segments"][0]["segment_order"], 0);
        assert!(json.get("company").is_none());
        assert!(json["personas"].as_array().unwrap().is_empty());
    }

    #[test]
    fn context_projects_children_as_records() {
        let submission = sample_submission();
        let ctx = CampaignContext::from_submission("Acme Corp", &submission);
        assert_eq!(ctx.submission_id, submission.id);
        assert_eq!(ctx.segments.len(), 1);

        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["client_name"], "Acme Corp");
        assert_eq!(json["segments"][0]["segment_name"], "SMB");
        assert!(json["segments"][0].get("id").is_none());
    }

    #[test]
    fn context_roundtrips_through_json() {
        let ctx = CampaignContext::from_submission("Acme Corp", &sample_submission());
        let json = serde_json::to_string(&ctx).unwrap();
        let back: CampaignContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
