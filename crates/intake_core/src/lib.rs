//! Onboarding intake core.
//!
//! Turns a client onboarding form payload into one submission plus its
//! segments and personas, and reads them back either as a full record or
//! as the denormalized [`types::CampaignContext`] consumed by the campaign
//! generator. Storage sits behind the [`ports::OnboardingStore`] port.

pub mod error;
pub mod memory;
pub mod ports;
pub mod service;
pub mod types;
pub mod validate;

pub use error::IntakeError;
pub use memory::MemoryStore;
pub use ports::OnboardingStore;
pub use service::OnboardingService;
pub use types::{
    CampaignContext, OnboardingSubmission, Persona, PersonaFields, Segment, SegmentFields,
    SubmissionDraft, SubmissionFields,
};
