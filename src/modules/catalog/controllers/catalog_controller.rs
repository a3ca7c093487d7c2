use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::{AdminAction, AdminGuard};
use crate::modules::catalog::models::{CreateWashServiceRequest, UpdateWashServiceRequest};
use crate::modules::catalog::services::CatalogService;

/// GET /services
pub async fn list_services(
    catalog: web::Data<Arc<CatalogService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(catalog.list_services().await?))
}

/// GET /services/{id}
pub async fn get_service(
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(catalog.get_service(path.into_inner()).await?))
}

/// POST /services (admin)
pub async fn create_service(
    catalog: web::Data<Arc<CatalogService>>,
    request: web::Json<CreateWashServiceRequest>,
) -> Result<HttpResponse, AppError> {
    let service = catalog.create_service(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(service))
}

/// PUT /services/{id} (admin)
pub async fn update_service(
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
    request: web::Json<UpdateWashServiceRequest>,
) -> Result<HttpResponse, AppError> {
    let service = catalog
        .update_service(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(service))
}

/// DELETE /services/{id} (admin)
pub async fn delete_service(
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    catalog.delete_service(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/services")
            .service(
                web::resource("")
                    .route(web::get().to(list_services))
                    .route(web::post().to(create_service))
                    .wrap(AdminGuard::new(AdminAction::ManageServices)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_service))
                    .route(web::put().to(update_service))
                    .route(web::delete().to(delete_service))
                    .wrap(AdminGuard::new(AdminAction::ManageServices)),
            ),
    );
}
