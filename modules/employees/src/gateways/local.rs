use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::EmployeesApi,
    error::EmployeesError,
    model::{Employee, NewEmployee},
};
use crate::domain::service::Service;

/// Local implementation of the EmployeesApi trait that delegates to the domain service
pub struct EmployeesLocalClient {
    service: Arc<Service>,
}

impl EmployeesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl EmployeesApi for EmployeesLocalClient {
    async fn create_employee(&self, new_employee: NewEmployee) -> Result<Employee, EmployeesError> {
        self.service
            .create_employee(new_employee)
            .await
            .map_err(Into::into)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, EmployeesError> {
        self.service.list_employees().await.map_err(Into::into)
    }

    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, EmployeesError> {
        self.service.get_employee_by_id(id).await.map_err(Into::into)
    }

    async fn update_employee(
        &self,
        id: i64,
        fields: NewEmployee,
    ) -> Result<Employee, EmployeesError> {
        self.service
            .update_employee(id, fields)
            .await
            .map_err(Into::into)
    }

    async fn delete_employee(&self, id: i64) -> Result<(), EmployeesError> {
        self.service.delete_employee(id).await.map_err(Into::into)
    }

    async fn find_employee_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, EmployeesError> {
        self.service
            .find_employee_by_name(first_name, last_name)
            .await
            .map_err(Into::into)
    }
}
