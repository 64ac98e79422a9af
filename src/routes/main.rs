use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::pages::show_page;

/// Liveness probe.
#[get("/up")]
pub async fn up() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

#[get("/about")]
pub async fn about(repo: web::Data<DieselRepository>) -> impl Responder {
    match show_page("about", repo.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => error_response(e),
    }
}

#[get("/contact")]
pub async fn contact(repo: web::Data<DieselRepository>) -> impl Responder {
    match show_page("contact", repo.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => error_response(e),
    }
}
