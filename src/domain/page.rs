use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{PageId, PageSlug, PageTitle};

/// Slugs of the pages exposed publicly.
pub const PUBLIC_PAGE_SLUGS: [&str; 2] = ["about", "contact"];

/// Editable static content page. `description` and `body` hold rich text (HTML).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub id: PageId,
    pub slug: PageSlug,
    pub title: PageTitle,
    pub description: Option<String>,
    pub body: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Page`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPage {
    pub slug: PageSlug,
    pub title: PageTitle,
    pub description: Option<String>,
    pub body: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Whether the slug names one of the fixed public pages.
pub fn is_public_slug(slug: &str) -> bool {
    PUBLIC_PAGE_SLUGS.contains(&slug)
}
