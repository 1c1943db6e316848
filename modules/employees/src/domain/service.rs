use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{Employee, NewEmployee};
use crate::domain::error::DomainError;
use crate::domain::repo::{EmployeesRepository, RepoError};

/// Domain service with the business rules for employee management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn EmployeesRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn EmployeesRepository>) -> Self {
        Self { repo }
    }

    #[instrument(
        name = "employees.service.create_employee",
        skip(self),
        fields(email = %candidate.email)
    )]
    pub async fn create_employee(&self, candidate: NewEmployee) -> Result<Employee, DomainError> {
        info!("Creating new employee");

        if self
            .repo
            .find_by_email(&candidate.email)
            .await
            .map_err(db_error)?
            .is_some()
        {
            return Err(DomainError::email_already_exists(candidate.email));
        }

        let email = candidate.email.clone();
        let employee = self
            .repo
            .save(None, candidate)
            .await
            .map_err(|e| write_error(e, email, None))?;

        info!("Successfully created employee with id={}", employee.id);
        Ok(employee)
    }

    #[instrument(name = "employees.service.list_employees", skip(self))]
    pub async fn list_employees(&self) -> Result<Vec<Employee>, DomainError> {
        debug!("Listing employees");
        let employees = self.repo.find_all().await.map_err(db_error)?;
        debug!("Listed {} employees", employees.len());
        Ok(employees)
    }

    #[instrument(
        name = "employees.service.get_employee_by_id",
        skip(self),
        fields(employee_id = id)
    )]
    pub async fn get_employee_by_id(&self, id: i64) -> Result<Option<Employee>, DomainError> {
        debug!("Getting employee by id");
        self.repo.find_by_id(id).await.map_err(db_error)
    }

    /// Overwrites all three fields; the stored id is kept.
    #[instrument(
        name = "employees.service.update_employee",
        skip(self),
        fields(employee_id = id, email = %patch.email)
    )]
    pub async fn update_employee(
        &self,
        id: i64,
        patch: NewEmployee,
    ) -> Result<Employee, DomainError> {
        info!("Updating employee");

        let existing = self
            .repo
            .find_by_id(id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::employee_not_found(id))?;

        let email = patch.email.clone();
        let updated = self
            .repo
            .save(Some(existing.id), patch)
            .await
            .map_err(|e| write_error(e, email, Some(id)))?;

        info!("Successfully updated employee");
        Ok(updated)
    }

    #[instrument(
        name = "employees.service.delete_employee",
        skip(self),
        fields(employee_id = id)
    )]
    pub async fn delete_employee(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting employee");

        if self.repo.find_by_id(id).await.map_err(db_error)?.is_none() {
            return Err(DomainError::employee_not_found(id));
        }
        self.repo.delete_by_id(id).await.map_err(db_error)?;

        info!("Successfully deleted employee");
        Ok(())
    }

    #[instrument(name = "employees.service.find_employee_by_name", skip(self))]
    pub async fn find_employee_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, DomainError> {
        debug!("Looking up employee by name");
        self.repo
            .find_by_name(first_name, last_name)
            .await
            .map_err(db_error)
    }
}

fn db_error(e: RepoError) -> DomainError {
    DomainError::database(e.to_string())
}

// Writes can lose a race after the pre-checks passed: the email may be taken
// meanwhile, or the row being updated deleted.
fn write_error(e: RepoError, email: String, updating: Option<i64>) -> DomainError {
    match (e, updating) {
        (RepoError::UniqueViolation(_), _) => DomainError::email_already_exists(email),
        (RepoError::NotFound, Some(id)) => DomainError::employee_not_found(id),
        (other, _) => db_error(other),
    }
}
