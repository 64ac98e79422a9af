use crate::domain::types::CategoryId;
use crate::dto::categories::{CategoryDto, CategoryPageDto};
use crate::dto::products::ProductDto;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CategoryListQuery, CategoryReader, ProductListQuery, ProductReader};

use super::{ServiceError, ServiceResult};

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader + ?Sized,
{
    match repo.list_categories(CategoryListQuery::default()) {
        Ok((_total, categories)) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// A category with one page of its products.
pub fn show_category<R>(
    category_id: i32,
    page: Option<usize>,
    repo: &R,
) -> ServiceResult<CategoryPageDto>
where
    R: CategoryReader + ProductReader + ?Sized,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    let category = match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let page = page.unwrap_or(1);
    let query = ProductListQuery::default()
        .category(category.id)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    match repo.list_products(query) {
        Ok((total, products)) => Ok(CategoryPageDto {
            category: category.into(),
            products: Paginated::new(
                products.into_iter().map(ProductDto::from).collect(),
                page,
                total,
                DEFAULT_ITEMS_PER_PAGE,
            ),
        }),
        Err(e) => {
            log::error!("Failed to list category products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::product::Product;
    use crate::domain::types::{
        CategoryName, PriceCents, ProductDescription, ProductId, ProductName,
    };
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn sample_repo() -> TestRepository {
        let epoch = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        let category = |id: i32, name: &str| Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            created_at: epoch,
            updated_at: epoch,
        };
        let tablets = category(1, "Tablets");
        let audio = category(2, "Audio");
        let products = (1..=30)
            .map(|i| Product {
                id: ProductId::new(i).unwrap(),
                category_id: tablets.id,
                category_name: tablets.name.clone(),
                name: ProductName::new(format!("Tablet {i}")).unwrap(),
                description: ProductDescription::new("Tablet").unwrap(),
                price: PriceCents::new(19_900).unwrap(),
                sale_price: None,
                created_at: epoch,
                updated_at: epoch,
            })
            .collect();
        TestRepository::new(vec![tablets, audio], products, vec![])
    }

    #[test]
    fn lists_categories_by_name() {
        let categories = list_categories(&sample_repo()).unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Audio", "Tablets"]);
    }

    #[test]
    fn paginates_category_products() {
        let repo = sample_repo();
        let first = show_category(1, None, &repo).unwrap();
        assert_eq!(first.category.name, "Tablets");
        assert_eq!(first.products.items.len(), DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(first.products.pages, 2);

        let second = show_category(1, Some(2), &repo).unwrap();
        assert_eq!(second.products.items.len(), 5);
    }

    #[test]
    fn unknown_category_is_not_found() {
        assert_eq!(show_category(9, None, &sample_repo()), Err(ServiceError::NotFound));
        assert_eq!(show_category(0, None, &sample_repo()), Err(ServiceError::NotFound));
    }
}
