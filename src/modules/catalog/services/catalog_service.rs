use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::catalog::models::{
    CreateWashServiceRequest, NewWashService, UpdateWashServiceRequest, WashService,
};
use crate::modules::catalog::repositories::WashServiceRepository;

/// Service for the wash menu shown at the counter
pub struct CatalogService {
    service_repo: Arc<dyn WashServiceRepository>,
}

impl CatalogService {
    pub fn new(service_repo: Arc<dyn WashServiceRepository>) -> Self {
        Self { service_repo }
    }

    pub async fn list_services(&self) -> Result<Vec<WashService>> {
        self.service_repo.list_active().await
    }

    pub async fn get_service(&self, id: i64) -> Result<WashService> {
        self.service_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service {} not found", id)))
    }

    pub async fn create_service(&self, request: CreateWashServiceRequest) -> Result<WashService> {
        let new_service = NewWashService::from_request(request)?;
        let service = self.service_repo.create(new_service).await?;

        tracing::info!(
            service_id = service.id,
            name = %service.name,
            price = %service.price,
            "Catalog service created"
        );

        Ok(service)
    }

    pub async fn update_service(
        &self,
        id: i64,
        changes: UpdateWashServiceRequest,
    ) -> Result<WashService> {
        let service = self.service_repo.update(id, &changes).await?;

        tracing::info!(service_id = id, active = service.active, "Catalog service updated");

        Ok(service)
    }

    pub async fn delete_service(&self, id: i64) -> Result<()> {
        self.service_repo.delete(id).await?;

        tracing::info!(service_id = id, "Catalog service deleted");

        Ok(())
    }
}
