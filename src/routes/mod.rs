use actix_web::HttpResponse;
use serde::Serialize;

use crate::services::ServiceError;

pub mod api;
pub mod main;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Map a service failure onto the HTTP status returned to API clients.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::TypeConstraint(error) => HttpResponse::BadRequest().json(ErrorBody { error }),
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}
