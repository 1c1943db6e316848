use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use modkit::api::context::ProblemContext;
use modkit::api::problem::{Problem, ProblemResponse};
use tracing::{error, info};

use crate::api::rest::dto::{EmployeeDto, EmployeeReq};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

/// Create a new employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    tag = "employees",
    operation_id = "employees.create_employee",
    request_body = EmployeeReq,
    responses(
        (status = 201, description = "Created employee", body = EmployeeDto),
        (status = 409, description = "Email already in use", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_employee(
    ctx: ProblemContext,
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<EmployeeReq>,
) -> Result<(StatusCode, Json<EmployeeDto>), ProblemResponse> {
    info!("Creating employee: {:?}", req_body);

    match svc.create_employee(req_body.into()).await {
        Ok(employee) => Ok((StatusCode::CREATED, Json(EmployeeDto::from(employee)))),
        Err(e) => {
            error!("Failed to create employee: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// List all employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    tag = "employees",
    operation_id = "employees.list_employees",
    responses(
        (status = 200, description = "All employees", body = [EmployeeDto]),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_employees(
    ctx: ProblemContext,
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<EmployeeDto>>, ProblemResponse> {
    info!("Listing employees");

    match svc.list_employees().await {
        Ok(employees) => Ok(Json(employees.into_iter().map(EmployeeDto::from).collect())),
        Err(e) => {
            error!("Failed to list employees: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Get a specific employee by id. A missing id is a bare 404.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    tag = "employees",
    operation_id = "employees.get_employee",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDto),
        (status = 404, description = "No employee with this id"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_employee(
    ctx: ProblemContext,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<Response, ProblemResponse> {
    info!("Getting employee with id: {}", id);

    match svc.get_employee_by_id(id).await {
        Ok(Some(employee)) => Ok(Json(EmployeeDto::from(employee)).into_response()),
        Ok(None) => Ok(StatusCode::NOT_FOUND.into_response()),
        Err(e) => {
            error!("Failed to get employee {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Replace an employee's fields. The path id wins over any id in the body.
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    tag = "employees",
    operation_id = "employees.update_employee",
    params(("id" = i64, Path, description = "Employee id")),
    request_body = EmployeeReq,
    responses(
        (status = 200, description = "Updated employee", body = EmployeeDto),
        (status = 404, description = "No employee with this id"),
        (status = 409, description = "Email already in use", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_employee(
    ctx: ProblemContext,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
    Json(req_body): Json<EmployeeReq>,
) -> Result<Response, ProblemResponse> {
    info!("Updating employee {} with: {:?}", id, req_body);

    let exists = svc
        .get_employee_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to look up employee {}: {}", id, e);
            map_domain_error(&e, &ctx)
        })?
        .is_some();
    if !exists {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    match svc.update_employee(id, req_body.into()).await {
        Ok(employee) => Ok(Json(EmployeeDto::from(employee)).into_response()),
        Err(e) => {
            error!("Failed to update employee {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Delete an employee by id
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    tag = "employees",
    operation_id = "employees.delete_employee",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Confirmation message", body = String, content_type = "text/plain"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_employee(
    ctx: ProblemContext,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<String, ProblemResponse> {
    info!("Deleting employee: {}", id);

    match svc.delete_employee(id).await {
        Ok(()) => Ok(format!("Employee with id {} deleted successfully", id)),
        Err(e) => {
            error!("Failed to delete employee {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}
