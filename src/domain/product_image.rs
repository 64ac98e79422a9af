use chrono::NaiveDateTime;

use crate::domain::types::ProductId;

/// Binary image attached to a product. A product has at most one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductImage {
    pub product_id: ProductId,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub created_at: NaiveDateTime,
}

impl ProductImage {
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }
}
