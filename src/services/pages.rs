use crate::domain::page::is_public_slug;
use crate::dto::pages::PageDto;
use crate::repository::PageReader;

use super::{ServiceError, ServiceResult};

/// Fetch one of the fixed public pages.
pub fn show_page<R>(slug: &str, repo: &R) -> ServiceResult<PageDto>
where
    R: PageReader + ?Sized,
{
    if !is_public_slug(slug) {
        return Err(ServiceError::NotFound);
    }

    match repo.get_page_by_slug(slug) {
        Ok(Some(page)) => Ok(page.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get page {slug}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::Page;
    use crate::domain::types::{PageId, PageSlug, PageTitle};
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn page(id: i32, slug: &str) -> Page {
        let epoch = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Page {
            id: PageId::new(id).unwrap(),
            slug: PageSlug::new(slug).unwrap(),
            title: PageTitle::new(slug.to_uppercase()).unwrap(),
            description: None,
            body: Some("<p>Hello</p>".into()),
            created_at: epoch,
            updated_at: epoch,
        }
    }

    #[test]
    fn serves_public_pages_only() {
        let repo = TestRepository::new(vec![], vec![], vec![page(1, "about"), page(2, "terms")]);

        let about = show_page("about", &repo).unwrap();
        assert_eq!(about.title, "ABOUT");
        assert_eq!(about.body.as_deref(), Some("<p>Hello</p>"));

        assert_eq!(show_page("terms", &repo), Err(ServiceError::NotFound));
        assert_eq!(show_page("contact", &repo), Err(ServiceError::NotFound));
    }
}
