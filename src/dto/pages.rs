use serde::Serialize;

use crate::domain::page::Page;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageDto {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub body: Option<String>,
}

impl From<Page> for PageDto {
    fn from(value: Page) -> Self {
        Self {
            slug: value.slug.into_inner(),
            title: value.title.into_inner(),
            description: value.description,
            body: value.body,
        }
    }
}
