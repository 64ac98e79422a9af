use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::page::{NewPage as DomainNewPage, Page as DomainPage};
use crate::domain::types::{PageSlug, PageTitle, TypeConstraintError};

/// Diesel model representing the `pages` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::pages)]
pub struct Page {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub body: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Page`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::pages)]
pub struct NewPage {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub body: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Page> for DomainPage {
    type Error = TypeConstraintError;

    fn try_from(page: Page) -> Result<Self, Self::Error> {
        Ok(Self {
            id: page.id.try_into()?,
            slug: PageSlug::new(page.slug)?,
            title: PageTitle::new(page.title)?,
            description: page.description,
            body: page.body,
            created_at: page.created_at,
            updated_at: page.updated_at,
        })
    }
}

impl From<DomainNewPage> for NewPage {
    fn from(page: DomainNewPage) -> Self {
        Self {
            slug: page.slug.into_inner(),
            title: page.title.into_inner(),
            description: page.description,
            body: page.body,
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}
