use axum::http::StatusCode;
use modkit::api::context::ProblemContext;
use modkit::api::problem::{Problem, ProblemResponse};

use crate::domain::error::DomainError;

/// Coded problem stamped with the request's path and id.
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    ctx: &ProblemContext,
) -> ProblemResponse {
    ctx.respond(Problem::coded(status, code, title, detail))
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, ctx: &ProblemContext) -> ProblemResponse {
    match e {
        DomainError::EmployeeNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "EMPLOYEES_NOT_FOUND",
            "Employee not found",
            format!("Employee with id {} was not found", id),
            ctx,
        ),
        DomainError::EmailAlreadyExists { email } => from_parts(
            StatusCode::CONFLICT,
            "EMPLOYEES_EMAIL_CONFLICT",
            "Email already exists",
            format!("Employee already exists with given email: {}", email),
            ctx,
        ),
        DomainError::Database { .. } => {
            // Details go to the log, not to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                ctx,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_names_the_email() {
        let resp = map_domain_error(
            &DomainError::email_already_exists("dup@example.com"),
            &ProblemContext::new("/api/v1/employees").with_request_id("req-1"),
        );
        assert_eq!(resp.0.status, 409);
        assert_eq!(resp.0.code, "EMPLOYEES_EMAIL_CONFLICT");
        assert!(resp.0.detail.contains("dup@example.com"));
        assert_eq!(resp.0.instance, "/api/v1/employees");
        assert_eq!(resp.0.trace_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn database_detail_is_not_leaked() {
        let resp = map_domain_error(
            &DomainError::database("no such table: employees"),
            &ProblemContext::new("/api/v1/employees"),
        );
        assert_eq!(resp.0.status, 500);
        assert_eq!(resp.0.code, "INTERNAL_DB");
        assert!(!resp.0.detail.contains("no such table"));
    }
}
