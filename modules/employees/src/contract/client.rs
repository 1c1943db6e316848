use async_trait::async_trait;

use crate::contract::{
    error::EmployeesError,
    model::{Employee, NewEmployee},
};

/// Public API trait for the employees module that other modules can use
#[async_trait]
pub trait EmployeesApi: Send + Sync {
    /// Create an employee; fails with `Conflict` when the email is taken
    async fn create_employee(&self, new_employee: NewEmployee) -> Result<Employee, EmployeesError>;

    /// All employees in id order
    async fn list_employees(&self) -> Result<Vec<Employee>, EmployeesError>;

    /// Get an employee by id; absence is not an error
    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, EmployeesError>;

    /// Replace first name, last name and email of an existing employee
    async fn update_employee(
        &self,
        id: i64,
        fields: NewEmployee,
    ) -> Result<Employee, EmployeesError>;

    /// Delete an employee by id
    async fn delete_employee(&self, id: i64) -> Result<(), EmployeesError>;

    /// Exact match on first and last name
    async fn find_employee_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, EmployeesError>;
}
