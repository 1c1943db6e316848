//! Shared HTTP plumbing for service modules: RFC 9457 problem responses and
//! process shutdown handling.

pub mod api;
pub mod runtime;

pub use api::context::{ProblemContext, REQUEST_ID_HEADER};
pub use api::problem::{Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};
pub use runtime::shutdown::{shutdown_token, wait_for_shutdown};
