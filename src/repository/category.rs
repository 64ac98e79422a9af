use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryId, CategoryName};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let total = categories::table
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = categories::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let items = items
            .order((categories::name.asc(), categories::id.asc()))
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok((total, items))
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::name.eq(name.as_str()))
            .order(categories::id.asc())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn count_products_by_category(&self) -> RepositoryResult<Vec<(CategoryName, usize)>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        let rows = products::table
            .inner_join(categories::table)
            .group_by((categories::id, categories::name))
            .select((categories::name, diesel::dsl::count(products::id)))
            .order(categories::name.asc())
            .load::<(String, i64)>(&mut conn)?;

        rows.into_iter()
            .map(|(name, count)| Ok((CategoryName::new(name)?, count as usize)))
            .collect()
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = diesel::insert_into(categories::table)
            .values(db_category)
            .returning(DbCategory::as_returning())
            .get_result(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn find_or_create_category(
        &self,
        name: &CategoryName,
        now: NaiveDateTime,
    ) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = conn.transaction(|conn| {
            let existing = categories::table
                .filter(categories::name.eq(name.as_str()))
                .order(categories::id.asc())
                .first::<DbCategory>(conn)
                .optional()?;

            match existing {
                Some(category) => Ok::<_, diesel::result::Error>(category),
                None => diesel::insert_into(categories::table)
                    .values(DbNewCategory::from(NewCategory::new(name.clone(), now)))
                    .returning(DbCategory::as_returning())
                    .get_result(conn),
            }
        })?;

        Ok(category.try_into()?)
    }
}
