use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product_image::ProductImage as DomainProductImage;
use crate::domain::types::TypeConstraintError;

/// Diesel model representing the `product_images` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub filename: String,
    pub content_type: String,
    pub byte_size: i32,
    pub data: Vec<u8>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`ProductImage`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage<'a> {
    pub product_id: i32,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub byte_size: i32,
    pub data: &'a [u8],
    pub created_at: NaiveDateTime,
}

impl<'a> TryFrom<&'a DomainProductImage> for NewProductImage<'a> {
    type Error = TypeConstraintError;

    fn try_from(image: &'a DomainProductImage) -> Result<Self, Self::Error> {
        let byte_size = i32::try_from(image.byte_size()).map_err(|_| {
            TypeConstraintError::InvalidValue(format!("image too large: {} bytes", image.byte_size()))
        })?;
        Ok(Self {
            product_id: image.product_id.get(),
            filename: &image.filename,
            content_type: &image.content_type,
            byte_size,
            data: &image.data,
            created_at: image.created_at,
        })
    }
}

impl TryFrom<ProductImage> for DomainProductImage {
    type Error = TypeConstraintError;

    fn try_from(image: ProductImage) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: image.product_id.try_into()?,
            filename: image.filename,
            content_type: image.content_type,
            data: image.data,
            created_at: image.created_at,
        })
    }
}
