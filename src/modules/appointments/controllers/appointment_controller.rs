use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::{AdminAction, AdminGuard};
use crate::modules::appointments::models::{
    AppointmentQuery, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::modules::appointments::services::AppointmentService;

/// GET /appointments?date=YYYY-MM-DD
pub async fn list_appointments(
    service: web::Data<Arc<AppointmentService>>,
    query: web::Query<AppointmentQuery>,
) -> Result<HttpResponse, AppError> {
    let appointments = service.list_appointments(query.date()?).await?;
    Ok(HttpResponse::Ok().json(appointments))
}

/// GET /appointments/{id}
pub async fn get_appointment(
    service: web::Data<Arc<AppointmentService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let appointment = service.get_appointment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

/// Book an appointment; open to the front desk like invoice creation
/// POST /appointments
pub async fn create_appointment(
    service: web::Data<Arc<AppointmentService>>,
    request: web::Json<CreateAppointmentRequest>,
) -> Result<HttpResponse, AppError> {
    let appointment = service.create_appointment(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(appointment))
}

/// PUT /appointments/{id} (admin)
pub async fn update_appointment(
    service: web::Data<Arc<AppointmentService>>,
    path: web::Path<i64>,
    request: web::Json<UpdateAppointmentRequest>,
) -> Result<HttpResponse, AppError> {
    let appointment = service
        .update_appointment(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(appointment))
}

/// DELETE /appointments/{id} (admin)
pub async fn delete_appointment(
    service: web::Data<Arc<AppointmentService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete_appointment(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure appointment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/appointments")
            .route("", web::get().to(list_appointments))
            .route("", web::post().to(create_appointment))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_appointment))
                    .route(web::put().to(update_appointment))
                    .route(web::delete().to(delete_appointment))
                    .wrap(AdminGuard::new(AdminAction::ManageAppointments)),
            ),
    );
}
