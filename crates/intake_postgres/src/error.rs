//! Classification of sqlx failures into the core error taxonomy.

use intake_core::IntakeError;

const CLIENT_FK: &str = "client_onboarding_submissions_client_id_fkey";

pub(crate) fn classify(err: sqlx::Error) -> IntakeError {
    match &err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => IntakeError::StoreUnavailable(err.to_string()),
        sqlx::Error::Database(db) => {
            let code = db.code().map(|c| c.into_owned()).unwrap_or_default();
            let constraint = db.constraint().unwrap_or("-").to_string();
            classify_sqlstate(&code, &constraint, db.message())
        }
        _ => IntakeError::Internal(anyhow::anyhow!("database error: {err}")),
    }
}

fn classify_sqlstate(code: &str, constraint: &str, message: &str) -> IntakeError {
    match code {
        "23503" if constraint == CLIENT_FK => {
            IntakeError::NotFound(format!("client referenced by submission ({message})"))
        }
        c if c.starts_with("23") => {
            IntakeError::Integrity(format!("{message} [sqlstate {c}, constraint {constraint}]"))
        }
        // serialization failure, deadlock, admin shutdown, statement timeout
        "40001" | "40P01" | "57P01" | "57014" => {
            IntakeError::StoreUnavailable(format!("{message} [sqlstate {code}]"))
        }
        c if c.starts_with("08") => IntakeError::StoreUnavailable(format!("{message} [sqlstate {c}]")),
        _ => IntakeError::Internal(anyhow::anyhow!("{message} [sqlstate {code}]")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_unavailable() {
        let err = classify(sqlx::Error::PoolTimedOut);
        assert!(err.is_retryable());
        assert_eq!(err.http_status(), 503);
    }

    #[test]
    fn row_not_found_is_internal() {
        // lookups use fetch_optional; a RowNotFound escaping is a bug
        let err = classify(sqlx::Error::RowNotFound);
        assert_eq!(err.code(), "internal_error");
    }

    #[test]
    fn client_fk_violation_is_not_found() {
        let err = classify_sqlstate("23503", CLIENT_FK, "violates foreign key");
        assert!(matches!(err, IntakeError::NotFound(_)));
    }

    #[test]
    fn child_fk_and_check_violations_are_integrity() {
        let err = classify_sqlstate(
            "23503",
            "client_segments_submission_id_fkey",
            "violates foreign key",
        );
        assert!(matches!(err, IntakeError::Integrity(_)));

        let err = classify_sqlstate("23514", "client_segments_revenue_percentage_check", "check");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn transient_sqlstates_are_unavailable() {
        for code in ["40001", "40P01", "08006", "57014"] {
            assert!(
                classify_sqlstate(code, "-", "boom").is_retryable(),
                "sqlstate {code}"
            );
        }
    }
}
