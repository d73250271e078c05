//! HTTP surface of the onboarding intake service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
