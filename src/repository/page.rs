use diesel::prelude::*;

use crate::domain::page::{NewPage, Page};
use crate::models::page::{NewPage as DbNewPage, Page as DbPage};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, PageReader, PageWriter};

impl PageReader for DieselRepository {
    fn get_page_by_slug(&self, slug: &str) -> RepositoryResult<Option<Page>> {
        use crate::schema::pages;

        let mut conn = self.conn()?;

        let page = pages::table
            .filter(pages::slug.eq(slug))
            .first::<DbPage>(&mut conn)
            .optional()?;

        Ok(page.map(TryInto::try_into).transpose()?)
    }
}

impl PageWriter for DieselRepository {
    fn create_page(&self, page: &NewPage) -> RepositoryResult<Page> {
        use crate::schema::pages;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(pages::table)
            .values(DbNewPage::from(page.clone()))
            .returning(DbPage::as_returning())
            .get_result(&mut conn)?;

        Ok(created.try_into()?)
    }
}
