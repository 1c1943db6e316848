use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{Employee, NewEmployee};

/// REST DTO for employee representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// REST DTO for create and update bodies.
///
/// `id` is accepted for compatibility with clients that echo a full record
/// back, but it is never used: create assigns one and update keeps the path id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<Employee> for EmployeeDto {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
        }
    }
}

impl From<EmployeeReq> for NewEmployee {
    fn from(req: EmployeeReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
        }
    }
}
