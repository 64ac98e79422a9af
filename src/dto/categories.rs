use serde::Serialize;

use crate::domain::category::Category;
use crate::dto::products::ProductDto;
use crate::pagination::Paginated;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
        }
    }
}

/// A category together with one page of its products.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryPageDto {
    pub category: CategoryDto,
    pub products: Paginated<ProductDto>,
}
