use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::{AdminAction, AdminGuard};
use crate::modules::inventory::models::{
    CreateInventoryItemRequest, ReduceStockRequest, UpdateInventoryItemRequest,
};
use crate::modules::inventory::services::InventoryService;

/// List active products and services
/// GET /inventory
pub async fn list_inventory(
    service: web::Data<Arc<InventoryService>>,
) -> Result<HttpResponse, AppError> {
    let items = service.list_inventory().await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /inventory/{id}
pub async fn get_item(
    service: web::Data<Arc<InventoryService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let item = service.get_item(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// GET /inventory/barcode/{barcode}
pub async fn get_by_barcode(
    service: web::Data<Arc<InventoryService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let item = service.get_by_barcode(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// POST /inventory (admin)
pub async fn create_item(
    service: web::Data<Arc<InventoryService>>,
    request: web::Json<CreateInventoryItemRequest>,
) -> Result<HttpResponse, AppError> {
    let item = service.create_item(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

/// PUT /inventory/{id} (admin)
pub async fn update_item(
    service: web::Data<Arc<InventoryService>>,
    path: web::Path<i64>,
    request: web::Json<UpdateInventoryItemRequest>,
) -> Result<HttpResponse, AppError> {
    let item = service
        .update_item(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(item))
}

/// DELETE /inventory/{id} (admin)
pub async fn delete_item(
    service: web::Data<Arc<InventoryService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete_item(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /inventory/{id}/reduce-stock (admin)
pub async fn reduce_stock(
    service: web::Data<Arc<InventoryService>>,
    path: web::Path<i64>,
    request: web::Json<ReduceStockRequest>,
) -> Result<HttpResponse, AppError> {
    let item = service
        .reduce_stock(path.into_inner(), request.quantity)
        .await?;
    Ok(HttpResponse::Ok().json(item))
}

/// Configure inventory routes. Reads are public; writes go through the
/// admin guard.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/inventory")
            .service(web::resource("/barcode/{barcode}").route(web::get().to(get_by_barcode)))
            .service(
                web::resource("")
                    .route(web::get().to(list_inventory))
                    .route(web::post().to(create_item))
                    .wrap(AdminGuard::new(AdminAction::ManageInventory)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_item))
                    .route(web::put().to(update_item))
                    .route(web::delete().to(delete_item))
                    .wrap(AdminGuard::new(AdminAction::ManageInventory)),
            )
            .service(
                web::resource("/{id}/reduce-stock")
                    .route(web::post().to(reduce_stock))
                    .wrap(AdminGuard::new(AdminAction::ManageInventory)),
            ),
    );
}
