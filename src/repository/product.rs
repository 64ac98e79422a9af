use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::product::{NewProduct, Product, ProductScope};
use crate::domain::types::{CategoryId, ProductId, ProductName};
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProductListQuery, ProductReader, ProductWriter};
use crate::schema::{categories, products};

fn load_with_category(
    conn: &mut SqliteConnection,
    product: DbProduct,
) -> RepositoryResult<Product> {
    let category_name = categories::table
        .filter(categories::id.eq(product.category_id))
        .select(categories::name)
        .first::<String>(conn)?;
    Ok((product, category_name).try_into()?)
}

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = products::table
                .inner_join(categories::table)
                .into_boxed::<Sqlite>();

            if let Some(category_id) = query.category_id {
                items = items.filter(products::category_id.eq(category_id.get()));
            }

            if let Some(search) = query.search.as_deref().map(str::trim) {
                if !search.is_empty() {
                    // SQLite LIKE is case-insensitive for ASCII.
                    let pattern = format!("%{}%", search.to_lowercase());
                    items = items.filter(
                        products::name
                            .like(pattern.clone())
                            .or(products::description.like(pattern)),
                    );
                }
            }

            if let Some(filter) = query.scope {
                items = match filter.scope {
                    ProductScope::NewlyAdded => {
                        items.filter(products::created_at.ge(filter.cutoff))
                    }
                    ProductScope::RecentlyUpdated => items
                        .filter(products::updated_at.ge(filter.cutoff))
                        .filter(products::created_at.lt(filter.cutoff)),
                    ProductScope::OnSale => items
                        .filter(products::sale_price_cents.is_not_null())
                        .filter(
                            products::sale_price_cents.lt(products::price_cents.nullable()),
                        ),
                };
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        items = match query.scope.map(|f| f.scope) {
            Some(ProductScope::RecentlyUpdated | ProductScope::OnSale) => {
                items.order((products::updated_at.desc(), products::id.desc()))
            }
            _ => items.order((products::created_at.desc(), products::id.desc())),
        };

        // Apply pagination if requested
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let items = items
            .select((DbProduct::as_select(), categories::name))
            .load::<(DbProduct, String)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok((total, items))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;

        let product = products::table
            .inner_join(categories::table)
            .filter(products::id.eq(id.get()))
            .select((DbProduct::as_select(), categories::name))
            .first::<(DbProduct, String)>(&mut conn)
            .optional()?;

        Ok(product.map(TryInto::try_into).transpose()?)
    }

    fn product_exists_in_category(
        &self,
        name: &ProductName,
        category_id: CategoryId,
    ) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(
            products::table
                .filter(products::name.eq(name.as_str()))
                .filter(products::category_id.eq(category_id.get())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let created = diesel::insert_into(products::table)
                .values(DbNewProduct::from(product))
                .returning(DbProduct::as_returning())
                .get_result::<DbProduct>(conn)?;

            load_with_category(conn, created)
        })
    }
}
