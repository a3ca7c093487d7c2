use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::{AdminAction, AdminGuard};
use crate::modules::invoices::models::{CreateInvoiceRequest, UpdateInvoiceStatusRequest};
use crate::modules::invoices::services::InvoiceService;

/// Create an invoice at the counter
/// POST /invoices
pub async fn create_invoice(
    service: web::Data<Arc<InvoiceService>>,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.create_invoice(request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(invoice))
}

/// Get invoice by ID, with items, for receipt printing
/// GET /invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.get_invoice(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(invoice))
}

/// GET /invoices
pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
) -> Result<HttpResponse, AppError> {
    let invoices = service.list_invoices().await?;

    Ok(HttpResponse::Ok().json(invoices))
}

/// Mark an invoice paid or cancelled
/// PUT /invoices/{id}/status (admin)
pub async fn update_status(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
    request: web::Json<UpdateInvoiceStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .update_status(path.into_inner(), request.status)
        .await?;

    Ok(HttpResponse::Ok().json(invoice))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::post().to(create_invoice))
            .route("", web::get().to(list_invoices))
            .route("/{id}", web::get().to(get_invoice))
            .service(
                web::resource("/{id}/status")
                    .route(web::put().to(update_status))
                    .wrap(AdminGuard::new(AdminAction::ManageInvoices)),
            ),
    );
}
