use chrono::{Duration, NaiveDateTime};

use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::page::{NewPage, Page};
use crate::domain::product::{FRESHNESS_WINDOW_DAYS, NewProduct, Product, ProductScope};
use crate::domain::product_image::ProductImage;
use crate::domain::types::{CategoryId, CategoryName, ProductId, ProductName};
use crate::pagination::Pagination;

use errors::RepositoryResult;

pub mod catalog;
pub mod category;
pub mod errors;
pub mod page;
pub mod product;
pub mod product_image;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// A [`ProductScope`] resolved against a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeFilter {
    pub scope: ProductScope,
    /// Start of the freshness window.
    pub cutoff: NaiveDateTime,
}

/// Query parameters used when listing or searching products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Filter by category identifier.
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,
    /// Restrict to one of the named listings.
    pub scope: Option<ScopeFilter>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn scope(mut self, scope: ProductScope, now: NaiveDateTime) -> Self {
        self.scope = Some(ScopeFilter {
            scope,
            cutoff: now - Duration::days(FRESHNESS_WINDOW_DAYS),
        });
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl CategoryListQuery {
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories ordered by name.
    fn list_categories(&self, query: CategoryListQuery)
    -> RepositoryResult<(usize, Vec<Category>)>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Retrieve the oldest category with exactly this name.
    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>>;
    /// Number of products per category, for categories that have any.
    fn count_products_by_category(&self) -> RepositoryResult<Vec<(CategoryName, usize)>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return it.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Return the category with this name, creating it when missing.
    fn find_or_create_category(
        &self,
        name: &CategoryName,
        now: NaiveDateTime,
    ) -> RepositoryResult<Category>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query parameters.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// Whether a product with exactly this name exists in the category.
    fn product_exists_in_category(
        &self,
        name: &ProductName,
        category_id: CategoryId,
    ) -> RepositoryResult<bool>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Persist a new product atomically and return it.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
}

/// Read access to product image attachments.
pub trait ProductImageReader {
    fn get_product_image(&self, product_id: ProductId) -> RepositoryResult<Option<ProductImage>>;
}

/// Write access to product image attachments.
pub trait ProductImageWriter {
    /// Attach an image to a product, replacing any previous attachment.
    fn attach_product_image(&self, image: &ProductImage) -> RepositoryResult<usize>;
}

/// Read-only operations for content pages.
pub trait PageReader {
    fn get_page_by_slug(&self, slug: &str) -> RepositoryResult<Option<Page>>;
}

/// Write operations for content pages.
pub trait PageWriter {
    /// Persist a new page. Duplicate slugs yield a conflict error.
    fn create_page(&self, page: &NewPage) -> RepositoryResult<Page>;
}

/// Bulk operations over the whole catalog.
pub trait CatalogWriter {
    /// Delete every image, product and category and restart their id sequences.
    ///
    /// Returns the number of deleted products.
    fn clear_catalog(&self) -> RepositoryResult<usize>;
}
