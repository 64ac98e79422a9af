use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;

use crate::domain::product::ProductScope;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::categories::{list_categories, show_category};
use crate::services::products::{
    PageQueryParams, ProductsQueryParams, list_products, list_scope, product_image, show_product,
};

#[get("/v1/products")]
pub async fn api_v1_products(
    params: web::Query<ProductsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_products(params.into_inner(), repo.get_ref(), Utc::now().naive_utc()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(e) => error_response(e),
    }
}

fn scoped(scope: ProductScope, params: PageQueryParams, repo: &DieselRepository) -> HttpResponse {
    match list_scope(scope, params.page, repo, Utc::now().naive_utc()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(e) => error_response(e),
    }
}

#[get("/v1/products/newly_added")]
pub async fn api_v1_newly_added(
    params: web::Query<PageQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    scoped(ProductScope::NewlyAdded, params.into_inner(), repo.get_ref())
}

#[get("/v1/products/recently_updated")]
pub async fn api_v1_recently_updated(
    params: web::Query<PageQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    scoped(ProductScope::RecentlyUpdated, params.into_inner(), repo.get_ref())
}

#[get("/v1/products/on_sale")]
pub async fn api_v1_on_sale(
    params: web::Query<PageQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    scoped(ProductScope::OnSale, params.into_inner(), repo.get_ref())
}

#[get("/v1/products/{product_id}")]
pub async fn api_v1_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_product(product_id.into_inner(), repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(e) => error_response(e),
    }
}

#[get("/v1/products/{product_id}/image")]
pub async fn api_v1_product_image(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match product_image(product_id.into_inner(), repo.get_ref()) {
        Ok(image) => HttpResponse::Ok()
            .content_type(image.content_type)
            .insert_header((
                "Content-Disposition",
                format!("inline; filename=\"{}\"", image.filename),
            ))
            .body(image.data),
        Err(e) => error_response(e),
    }
}

#[get("/v1/categories")]
pub async fn api_v1_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_categories(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(e) => error_response(e),
    }
}

#[get("/v1/categories/{category_id}")]
pub async fn api_v1_category(
    category_id: web::Path<i32>,
    params: web::Query<PageQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_category(category_id.into_inner(), params.page, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(e) => error_response(e),
    }
}
