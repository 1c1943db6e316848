use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use utoipa::OpenApi;

use crate::api::rest::routes::{self, EmployeesApiDoc};
use crate::contract::client::EmployeesApi;
use crate::domain::service::Service;
use crate::gateways::local::EmployeesLocalClient;
use crate::infra::storage::{migrations::Migrator, SeaOrmEmployeesRepository};

/// Employees module: owns the schema, the domain service and the REST surface.
#[derive(Clone)]
pub struct EmployeesModule {
    service: Arc<Service>,
    client: Arc<dyn EmployeesApi>,
}

impl EmployeesModule {
    /// Run the module migrations on `db`, then wire repository, service and client.
    pub async fn init(db: DatabaseConnection) -> anyhow::Result<Self> {
        info!("Running employees database migrations");
        Migrator::up(&db, None).await?;
        info!("Employees database migrations completed successfully");

        let repo = SeaOrmEmployeesRepository::new(db);
        let service = Arc::new(Service::new(Arc::new(repo)));
        let client: Arc<dyn EmployeesApi> = Arc::new(EmployeesLocalClient::new(service.clone()));

        Ok(Self { service, client })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process API for other modules.
    pub fn client(&self) -> Arc<dyn EmployeesApi> {
        self.client.clone()
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering employees REST routes");
        routes::register_routes(router, self.service.clone())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        EmployeesApiDoc::openapi()
    }
}
