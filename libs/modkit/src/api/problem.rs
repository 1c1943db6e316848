use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Base URI for application error codes; `type` is `<base>/<code>`.
pub const ERROR_TYPE_BASE: &str = "https://errors.example.com";

/// RFC 9457 Problem Details body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "Problem",
    description = "RFC 9457 Problem Details for HTTP APIs"
)]
pub struct Problem {
    /// URI identifying the problem type (`about:blank` when untyped).
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    /// Explanation specific to this occurrence.
    pub detail: String,
    /// Request path that produced the problem.
    pub instance: String,
    /// Stable machine-readable code, e.g. `EMPLOYEES_NOT_FOUND`.
    pub code: String,
    /// The request's `x-request-id`, matching the `request_id` in logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
        }
    }

    /// Problem carrying an application code; `type` is derived from the code.
    pub fn coded(
        status: StatusCode,
        code: &str,
        title: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(status, title, detail)
            .with_type(format!("{ERROR_TYPE_BASE}/{code}"))
            .with_code(code)
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Axum response wrapper for [`Problem`].
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let mut resp = (status, axum::Json(self.0)).into_response();
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_has_status_and_problem_content_type() {
        let resp = ProblemResponse(Problem::new(StatusCode::CONFLICT, "Conflict", "email taken"))
            .into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(
            resp.headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some(APPLICATION_PROBLEM_JSON)
        );
    }

    #[test]
    fn coded_problem_derives_type_from_code() {
        let p = Problem::coded(
            StatusCode::NOT_FOUND,
            "EMPLOYEES_NOT_FOUND",
            "Employee not found",
            "no such id",
        )
        .with_instance("/api/v1/employees/7")
        .with_trace_id("42");

        assert_eq!(p.status, 404);
        assert_eq!(p.type_url, "https://errors.example.com/EMPLOYEES_NOT_FOUND");
        assert_eq!(p.code, "EMPLOYEES_NOT_FOUND");
        assert_eq!(p.instance, "/api/v1/employees/7");
        assert_eq!(p.trace_id.as_deref(), Some("42"));
    }

    #[test]
    fn serializes_type_field_and_skips_missing_trace_id() {
        let v = serde_json::to_value(Problem::new(StatusCode::CONFLICT, "Conflict", "dup")).unwrap();
        assert_eq!(v["type"], "about:blank");
        assert_eq!(v["status"], 409);
        assert!(v.get("trace_id").is_none());
    }

    #[test]
    fn out_of_range_status_falls_back_to_500() {
        let mut p = Problem::new(StatusCode::OK, "odd", "odd");
        p.status = 1000;
        assert_eq!(p.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
