use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::product::Product;

/// Product as exposed over the API. Prices are rendered for display and also
/// given in cents.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductDto {
    pub id: i32,
    pub category_id: i32,
    pub category_name: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub price_cents: i32,
    pub sale_price: Option<String>,
    pub effective_price: String,
    pub on_sale: bool,
    pub image_path: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            on_sale: value.on_sale(),
            effective_price: value.effective_price().to_string(),
            image_path: format!("/api/v1/products/{}/image", value.id),
            id: value.id.get(),
            category_id: value.category_id.get(),
            category_name: value.category_name.into_inner(),
            name: value.name.into_inner(),
            description: value.description.into_inner(),
            price: value.price.to_string(),
            price_cents: value.price.get(),
            sale_price: value.sale_price.map(|p| p.to_string()),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
