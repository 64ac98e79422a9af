use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{
    CategoryName, PriceCents, ProductDescription, ProductName, TypeConstraintError,
};

/// Diesel model representing a row in the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub price_cents: i32,
    pub sale_price_cents: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`] used for creating new rows.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub category_id: i32,
    pub name: &'a str,
    pub description: &'a str,
    pub price_cents: i32,
    pub sale_price_cents: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(product: &'a DomainNewProduct) -> Self {
        Self {
            category_id: product.category_id.get(),
            name: product.name.as_str(),
            description: product.description.as_str(),
            price_cents: product.price.get(),
            sale_price_cents: product.sale_price.map(PriceCents::get),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// A product row joined with the name of its category.
impl TryFrom<(Product, String)> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from((product, category_name): (Product, String)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            category_id: product.category_id.try_into()?,
            category_name: CategoryName::new(category_name)?,
            name: ProductName::new(product.name)?,
            description: ProductDescription::new(product.description)?,
            price: PriceCents::new(product.price_cents)?,
            sale_price: product.sale_price_cents.map(PriceCents::new).transpose()?,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}
