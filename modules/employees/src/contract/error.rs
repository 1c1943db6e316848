use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmployeesError {
    #[error("Employee not found: {id}")]
    NotFound { id: i64 },

    #[error("Employee with email '{email}' already exists")]
    Conflict { email: String },

    #[error("Internal error")]
    Internal,
}

impl EmployeesError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn conflict(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for EmployeesError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            EmployeeNotFound { id } => Self::not_found(id),
            EmailAlreadyExists { email } => Self::conflict(email),
            Database { .. } => Self::internal(),
        }
    }
}
