use diesel::prelude::*;

use crate::repository::errors::RepositoryResult;
use crate::repository::{CatalogWriter, DieselRepository};

impl CatalogWriter for DieselRepository {
    fn clear_catalog(&self) -> RepositoryResult<usize> {
        use crate::schema::{categories, product_images, products};

        let mut conn = self.conn()?;

        let deleted = conn.transaction(|conn| {
            diesel::delete(product_images::table).execute(conn)?;
            let deleted = diesel::delete(products::table).execute(conn)?;
            diesel::delete(categories::table).execute(conn)?;
            diesel::sql_query(
                "DELETE FROM sqlite_sequence \
                 WHERE name IN ('product_images', 'products', 'categories')",
            )
            .execute(conn)?;
            Ok::<_, diesel::result::Error>(deleted)
        })?;

        Ok(deleted)
    }
}
