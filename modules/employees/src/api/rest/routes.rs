use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use modkit::api::problem::Problem;
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

pub const EMPLOYEES_PATH: &str = "/api/v1/employees";
pub const EMPLOYEE_BY_ID_PATH: &str = "/api/v1/employees/{id}";

/// OpenAPI fragment for the employee routes.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_employee,
        handlers::list_employees,
        handlers::get_employee,
        handlers::update_employee,
        handlers::delete_employee,
    ),
    components(schemas(dto::EmployeeDto, dto::EmployeeReq, Problem)),
    tags((name = "employees", description = "Employee records"))
)]
pub struct EmployeesApiDoc;

/// Mount the employee routes on `router` with the service as an extension.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let employees = Router::new()
        .route(
            EMPLOYEES_PATH,
            post(handlers::create_employee).get(handlers::list_employees),
        )
        .route(
            EMPLOYEE_BY_ID_PATH,
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .layer(Extension(service));

    router.merge(employees)
}
