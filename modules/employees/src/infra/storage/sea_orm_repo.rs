//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it can run on a `DatabaseConnection`
//! or inside a transaction.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::contract::model::{Employee, NewEmployee};
use crate::domain::repo::{EmployeesRepository, RepoError, RepoResult};
use crate::infra::storage::entity::{
    ActiveModel as EmployeeAM, Column, Entity as EmployeeEntity,
};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmEmployeesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmEmployeesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// Unique-constraint failures and vanished rows keep their own variants; the rest become `Db`.
fn write_failed(err: DbErr, what: &'static str) -> RepoError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return RepoError::NotFound;
    }
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepoError::UniqueViolation(detail),
        _ => RepoError::Db(anyhow::Error::new(err).context(what)),
    }
}

#[async_trait::async_trait]
impl<C> EmployeesRepository for SeaOrmEmployeesRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn save(&self, id: Option<i64>, fields: NewEmployee) -> RepoResult<Employee> {
        let model = EmployeeAM {
            id: id.map_or(NotSet, Set),
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            email: Set(fields.email),
        };
        let stored = match id {
            None => model
                .insert(&self.conn)
                .await
                .map_err(|e| write_failed(e, "insert failed"))?,
            Some(_) => model
                .update(&self.conn)
                .await
                .map_err(|e| write_failed(e, "update failed"))?,
        };
        Ok(stored.into())
    }

    async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let rows = EmployeeEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("find_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Employee>> {
        let found = EmployeeEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        EmployeeEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        let found = EmployeeEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_by_email failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>> {
        let found = EmployeeEntity::find()
            .filter(Column::FirstName.eq(first_name))
            .filter(Column::LastName.eq(last_name))
            .order_by_asc(Column::Id)
            .one(&self.conn)
            .await
            .context("find_by_name failed")?;
        Ok(found.map(Into::into))
    }
}
