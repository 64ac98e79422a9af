use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, CategoryName, PriceCents, ProductDescription, ProductId, ProductName,
};

/// A catalog product together with the name of its category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    /// Name of the category referenced by `category_id`.
    pub category_name: CategoryName,
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: PriceCents,
    pub sale_price: Option<PriceCents>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// A product is on sale when it has a sale price below its regular price.
    pub fn on_sale(&self) -> bool {
        matches!(self.sale_price, Some(sale) if sale < self.price)
    }

    /// Price the customer actually pays.
    pub fn effective_price(&self) -> PriceCents {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }
}

/// Days a product counts as newly added or recently updated.
pub const FRESHNESS_WINDOW_DAYS: i64 = 3;

/// Named product listings offered by the storefront.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductScope {
    /// Created within the freshness window, newest first.
    NewlyAdded,
    /// Updated within the freshness window but created before it.
    RecentlyUpdated,
    /// Sale price present and below the regular price.
    OnSale,
}

impl ProductScope {
    /// Parses the short `filter` query value used by the listing page.
    pub fn from_filter(value: &str) -> Option<Self> {
        match value.trim() {
            "new" => Some(Self::NewlyAdded),
            "recent" => Some(Self::RecentlyUpdated),
            "sale" => Some(Self::OnSale),
            _ => None,
        }
    }
}

/// Information required to create a new [`Product`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: PriceCents,
    pub sale_price: Option<PriceCents>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
