use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::product::ProductScope;
use crate::domain::product_image::ProductImage;
use crate::domain::types::{CategoryId, ProductId};
use crate::dto::products::ProductDto;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductImageReader, ProductListQuery, ProductReader};

use super::{ServiceError, ServiceResult};

/// Query parameters accepted by the product listing endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct ProductsQueryParams {
    pub keyword: Option<String>,
    pub category_id: Option<i32>,
    /// `new`, `recent` or `sale`. Unknown values list everything.
    pub filter: Option<String>,
    pub page: Option<usize>,
}

/// Query parameters carrying only a page number.
#[derive(Deserialize, Debug, Default)]
pub struct PageQueryParams {
    pub page: Option<usize>,
}

fn fetch_page<R>(
    repo: &R,
    query: ProductListQuery,
    page: usize,
) -> ServiceResult<Paginated<ProductDto>>
where
    R: ProductReader + ?Sized,
{
    match repo.list_products(query.paginate(page, DEFAULT_ITEMS_PER_PAGE)) {
        Ok((total, products)) => Ok(Paginated::new(
            products.into_iter().map(ProductDto::from).collect(),
            page,
            total,
            DEFAULT_ITEMS_PER_PAGE,
        )),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Search, filter and paginate the catalog.
pub fn list_products<R>(
    params: ProductsQueryParams,
    repo: &R,
    now: NaiveDateTime,
) -> ServiceResult<Paginated<ProductDto>>
where
    R: ProductReader + ?Sized,
{
    let mut query = ProductListQuery::default();

    if let Some(category_id) = params.category_id {
        query = query.category(CategoryId::new(category_id)?);
    }
    if let Some(keyword) = params
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        query = query.search(keyword);
    }
    if let Some(scope) = params.filter.as_deref().and_then(ProductScope::from_filter) {
        query = query.scope(scope, now);
    }

    fetch_page(repo, query, params.page.unwrap_or(1))
}

/// One of the named listings: newly added, recently updated or on sale.
pub fn list_scope<R>(
    scope: ProductScope,
    page: Option<usize>,
    repo: &R,
    now: NaiveDateTime,
) -> ServiceResult<Paginated<ProductDto>>
where
    R: ProductReader + ?Sized,
{
    let query = ProductListQuery::default().scope(scope, now);
    fetch_page(repo, query, page.unwrap_or(1))
}

pub fn show_product<R>(product_id: i32, repo: &R) -> ServiceResult<ProductDto>
where
    R: ProductReader + ?Sized,
{
    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// The image attached to a product.
pub fn product_image<R>(product_id: i32, repo: &R) -> ServiceResult<ProductImage>
where
    R: ProductImageReader + ?Sized,
{
    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_product_image(product_id) {
        Ok(Some(image)) => Ok(image),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product image: {e}");
            Err(ServiceError::Internal)
        }
    }
}
