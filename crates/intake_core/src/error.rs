use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("invalid `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntakeError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound(_) => 404,
            Self::StoreUnavailable(_) => 503,
            Self::Integrity(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Integrity(_) => "integrity_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Offending payload field, for validation failures only.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Transient failures the caller may retry with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── http_status ──────────────────────────────────────────────

    #[test]
    fn http_status_validation() {
        assert_eq!(IntakeError::validation("client_id", "missing").http_status(), 400);
    }

    #[test]
    fn http_status_not_found() {
        assert_eq!(IntakeError::NotFound("x".into()).http_status(), 404);
    }

    #[test]
    fn http_status_store_unavailable() {
        assert_eq!(IntakeError::StoreUnavailable("x".into()).http_status(), 503);
    }

    #[test]
    fn http_status_integrity_and_internal() {
        assert_eq!(IntakeError::Integrity("x".into()).http_status(), 500);
        let err = IntakeError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.http_status(), 500);
    }

    // ── Display ──────────────────────────────────────────────────

    #[test]
    fn display_validation_names_field() {
        let e = IntakeError::validation("segments[1].segment_name", "is required");
        assert_eq!(e.to_string(), "invalid `segments[1].segment_name`: is required");
        assert_eq!(e.field(), Some("segments[1].segment_name"));
    }

    #[test]
    fn display_not_found() {
        let e = IntakeError::NotFound("client acme".into());
        assert_eq!(e.to_string(), "not found: client acme");
        assert_eq!(e.field(), None);
    }

    #[test]
    fn only_store_unavailable_is_retryable() {
        assert!(IntakeError::StoreUnavailable("timeout".into()).is_retryable());
        assert!(!IntakeError::Integrity("fk".into()).is_retryable());
        assert!(!IntakeError::validation("body", "bad").is_retryable());
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(IntakeError::validation("a", "b").code(), "validation_error");
        assert_eq!(IntakeError::NotFound("a".into()).code(), "not_found");
        assert_eq!(IntakeError::StoreUnavailable("a".into()).code(), "store_unavailable");
        assert_eq!(IntakeError::Integrity("a".into()).code(), "integrity_error");
        assert_eq!(
            IntakeError::Internal(anyhow::anyhow!("a")).code(),
            "internal_error"
        );
    }
}
