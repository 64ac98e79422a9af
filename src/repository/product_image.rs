use diesel::prelude::*;

use crate::domain::product_image::ProductImage;
use crate::domain::types::ProductId;
use crate::models::product_image::{
    NewProductImage as DbNewProductImage, ProductImage as DbProductImage,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProductImageReader, ProductImageWriter};

impl ProductImageReader for DieselRepository {
    fn get_product_image(&self, product_id: ProductId) -> RepositoryResult<Option<ProductImage>> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        let image = product_images::table
            .filter(product_images::product_id.eq(product_id.get()))
            .first::<DbProductImage>(&mut conn)
            .optional()?;

        Ok(image.map(TryInto::try_into).transpose()?)
    }
}

impl ProductImageWriter for DieselRepository {
    fn attach_product_image(&self, image: &ProductImage) -> RepositoryResult<usize> {
        use crate::schema::product_images;

        let new_image = DbNewProductImage::try_from(image)?;
        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(
                product_images::table.filter(product_images::product_id.eq(new_image.product_id)),
            )
            .execute(conn)?;

            diesel::insert_into(product_images::table)
                .values(&new_image)
                .execute(conn)
        })?;

        Ok(affected)
    }
}
