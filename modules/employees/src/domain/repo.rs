use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::{Employee, NewEmployee};

/// Storage failures as seen by the domain.
#[derive(Error, Debug)]
pub enum RepoError {
    /// The store refused a write on a unique column.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The row addressed by an update is gone.
    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait EmployeesRepository: Send + Sync {
    /// Insert when `id` is `None`, otherwise overwrite the row with that id.
    /// Returns the stored record with its id.
    async fn save(&self, id: Option<i64>, fields: NewEmployee) -> RepoResult<Employee>;
    /// Every record, ascending by id.
    async fn find_all(&self) -> RepoResult<Vec<Employee>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Employee>>;
    /// Remove the row if present; a missing row is not an error here.
    async fn delete_by_id(&self, id: i64) -> RepoResult<()>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>>;
    /// Exact match on both names; the lowest id wins on duplicates.
    async fn find_by_name(&self, first_name: &str, last_name: &str)
        -> RepoResult<Option<Employee>>;
}
