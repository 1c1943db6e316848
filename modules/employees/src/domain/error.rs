use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Employee not found: {id}")]
    EmployeeNotFound { id: i64 },

    #[error("Employee with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn employee_not_found(id: i64) -> Self {
        Self::EmployeeNotFound { id }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
