use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::problem::{Problem, ProblemResponse};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Where a handler's error happened: the request path and its `x-request-id`.
///
/// Extracting never fails; a request without the header just has no id.
#[derive(Debug, Clone, Default)]
pub struct ProblemContext {
    pub instance: String,
    pub request_id: Option<String>,
}

impl ProblemContext {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Stamp `problem` with this request's path and id.
    pub fn respond(&self, problem: Problem) -> ProblemResponse {
        let mut problem = problem.with_instance(&self.instance);
        if let Some(id) = &self.request_id {
            problem = problem.with_trace_id(id);
        }
        ProblemResponse(problem)
    }
}

impl<S> FromRequestParts<S> for ProblemContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Ok(Self {
            instance: parts.uri.path().to_owned(),
            request_id,
        })
    }
}
