//! CSV import: reset the catalog, create categories, then create products
//! row by row up to the configured target.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use rand::Rng;

use crate::domain::category::Category;
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{PriceCents, ProductDescription, ProductName, TypeConstraintError};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CatalogWriter, CategoryReader, CategoryWriter, ProductImageWriter, ProductWriter,
};
use crate::seed::SeedError;
use crate::seed::categories::{KnownCategories, collect_category_names};
use crate::seed::description::synthesize_description;
use crate::seed::fetch::HttpFetch;
use crate::seed::images::ImageFetcher;
use crate::seed::pricing::estimate_price;
use crate::seed::row::{CsvRow, LoadedRows, parse_timestamp, read_rows};

pub const DEFAULT_TARGET_PRODUCTS: usize = 100;
const PROGRESS_EVERY: usize = 25;
const SUMMARY_SAMPLES: usize = 5;

/// Outcome of one CSV import run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub categories: usize,
    pub created: usize,
    pub skipped: usize,
    pub malformed_rows: usize,
    pub images_attached: usize,
    /// First products created, for the summary.
    pub samples: Vec<Product>,
}

impl ImportReport {
    /// Rows the importer looked at before stopping.
    pub fn rows_processed(&self) -> usize {
        self.created + self.skipped
    }
}

/// Mutable bookkeeping for one run.
#[derive(Debug, Default)]
struct ImportState {
    seen_keys: HashSet<String>,
    created: usize,
    skipped: usize,
    images_attached: usize,
    samples: Vec<Product>,
}

#[derive(Debug)]
enum RowSkip {
    MissingNameOrBrand,
    Duplicate,
    NoCategory,
    Invalid(TypeConstraintError),
    Persist(RepositoryError),
}

pub struct CsvImporter<'a, R: ?Sized, F: ?Sized> {
    repo: &'a R,
    images: ImageFetcher<'a, F>,
    target: usize,
}

impl<'a, R, F> CsvImporter<'a, R, F>
where
    R: CatalogWriter + CategoryWriter + ProductWriter + ProductImageWriter + ?Sized,
    F: HttpFetch + ?Sized,
{
    pub fn new(repo: &'a R, fetcher: &'a F, target: usize, image_timeout: Duration) -> Self {
        Self {
            repo,
            images: ImageFetcher::new(fetcher, image_timeout),
            target,
        }
    }

    /// Import `path`. Nothing is modified when the file is missing or its
    /// header cannot be read.
    pub fn import_file<G: Rng>(&self, path: &Path, rng: &mut G) -> Result<ImportReport, SeedError> {
        if !path.is_file() {
            return Err(SeedError::MissingInput(path.to_path_buf()));
        }

        log::info!("Loading products from {}", path.display());
        let loaded = read_rows(BufReader::new(File::open(path)?))?;
        self.import_rows(&loaded, rng, Utc::now().naive_utc())
    }

    /// Replace the catalog with products built from `loaded`.
    pub fn import_rows<G: Rng>(
        &self,
        loaded: &LoadedRows,
        rng: &mut G,
        now: NaiveDateTime,
    ) -> Result<ImportReport, SeedError> {
        let removed = self.repo.clear_catalog()?;
        log::info!("Cleared existing catalog ({removed} products)");

        log::info!("Scanning categories...");
        let names = collect_category_names(&loaded.rows);
        let categories = KnownCategories::create(self.repo, &names, now)?;
        log::info!("Created {} categories", categories.len());

        let mut state = ImportState::default();
        for row in &loaded.rows {
            if state.created >= self.target {
                break;
            }

            match self.import_row(row, &categories, &mut state, rng, now) {
                Ok(product) => {
                    state.created += 1;
                    if self
                        .images
                        .attach_and_log(self.repo, &product, row.image_urls.as_deref())
                    {
                        state.images_attached += 1;
                    }
                    if state.samples.len() < SUMMARY_SAMPLES {
                        state.samples.push(product);
                    }
                    if state.created % PROGRESS_EVERY == 0 {
                        log::info!("Progress: {}/{} products created", state.created, self.target);
                    }
                }
                Err(skip) => {
                    state.skipped += 1;
                    match skip {
                        RowSkip::MissingNameOrBrand | RowSkip::Duplicate => {}
                        RowSkip::NoCategory => {
                            log::warn!("No category for {}", row.name.as_deref().unwrap_or("?"));
                        }
                        RowSkip::Invalid(e) => log::warn!(
                            "Failed to create product {}: {e}",
                            row.name.as_deref().unwrap_or("?")
                        ),
                        RowSkip::Persist(e) => log::warn!(
                            "Failed to create product {}: {e}",
                            row.name.as_deref().unwrap_or("?")
                        ),
                    }
                }
            }
        }

        Ok(ImportReport {
            categories: categories.len(),
            created: state.created,
            skipped: state.skipped,
            malformed_rows: loaded.malformed,
            images_attached: state.images_attached,
            samples: state.samples,
        })
    }

    fn import_row<G: Rng>(
        &self,
        row: &CsvRow,
        categories: &KnownCategories,
        state: &mut ImportState,
        rng: &mut G,
        now: NaiveDateTime,
    ) -> Result<Product, RowSkip> {
        let (Some(name), Some(brand)) = (row.name.as_deref(), row.brand.as_deref()) else {
            return Err(RowSkip::MissingNameOrBrand);
        };

        let key = row.dedup_key().ok_or(RowSkip::MissingNameOrBrand)?;
        if !state.seen_keys.insert(key) {
            return Err(RowSkip::Duplicate);
        }

        let category = categories.resolve(row).ok_or(RowSkip::NoCategory)?;
        let amount = estimate_price(name, Some(brand), rng);
        let new_product =
            build_product(row, name, category, amount, now).map_err(RowSkip::Invalid)?;

        let product = self
            .repo
            .create_product(&new_product)
            .map_err(RowSkip::Persist)?;
        log::info!("Created product: {} ({brand}) - {}", product.name, product.price);
        Ok(product)
    }
}

fn build_product(
    row: &CsvRow,
    name: &str,
    category: &Category,
    amount: f64,
    now: NaiveDateTime,
) -> Result<NewProduct, TypeConstraintError> {
    Ok(NewProduct {
        category_id: category.id,
        name: ProductName::new(name)?,
        description: ProductDescription::new(synthesize_description(row))?,
        price: PriceCents::from_amount(amount)?,
        sale_price: None,
        created_at: parse_timestamp(row.date_added.as_deref(), now),
        updated_at: parse_timestamp(row.date_updated.as_deref(), now),
    })
}

/// Log the end-of-run summary, including product counts per category.
pub fn log_summary<R>(repo: &R, report: &ImportReport) -> RepositoryResult<()>
where
    R: CategoryReader + ?Sized,
{
    log::info!("Seeding completed");
    log::info!("  Categories: {}", report.categories);
    log::info!("  Products created: {}", report.created);
    log::info!("  Rows skipped: {}", report.skipped);
    log::info!("  Rows processed: {}", report.rows_processed());
    log::info!("  Images attached: {}", report.images_attached);
    if report.malformed_rows > 0 {
        log::warn!("  Malformed rows dropped: {}", report.malformed_rows);
    }

    log::info!("Sample products:");
    for product in &report.samples {
        log::info!(
            "  {} [{}] {}",
            product.name,
            product.category_name,
            product.price
        );
    }

    log::info!("Products per category:");
    for (category, count) in repo.count_products_by_category()? {
        log::info!("  {category}: {count}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ProductReader;
    use crate::repository::ProductListQuery;
    use crate::repository::test::TestRepository;
    use crate::seed::fetch::FetchError;
    use chrono::DateTime;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::Cell;

    struct CountingFetcher {
        calls: Cell<usize>,
        failing_url: Option<&'static str>,
    }

    impl HttpFetch for CountingFetcher {
        fn fetch(&self, url: &str, _timeout: Option<Duration>) -> Result<Vec<u8>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.failing_url == Some(url) {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: 500,
                });
            }
            Ok(vec![1, 2, 3, 4])
        }
    }

    fn fetcher() -> CountingFetcher {
        CountingFetcher {
            calls: Cell::new(0),
            failing_url: None,
        }
    }

    fn now() -> NaiveDateTime {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap().naive_utc()
    }

    fn row(name: &str, brand: &str, categories: &str) -> CsvRow {
        CsvRow {
            name: Some(name.to_string()).filter(|s| !s.is_empty()),
            brand: Some(brand.to_string()).filter(|s| !s.is_empty()),
            categories: Some(categories.to_string()),
            ..CsvRow::default()
        }
    }

    fn run(
        repo: &TestRepository,
        fetcher: &CountingFetcher,
        rows: Vec<CsvRow>,
        target: usize,
    ) -> ImportReport {
        let importer = CsvImporter::new(repo, fetcher, target, Duration::from_secs(10));
        let loaded = LoadedRows { rows, malformed: 0 };
        importer
            .import_rows(&loaded, &mut StdRng::seed_from_u64(1), now())
            .unwrap()
    }

    #[test]
    fn blank_name_or_brand_rows_are_counted_as_skipped() {
        let repo = TestRepository::default();
        let report = run(
            &repo,
            &fetcher(),
            vec![
                row("", "Amazon", "Speakers"),
                row("Echo", "", "Speakers"),
                row("Echo", "Amazon", "Speakers"),
            ],
            100,
        );

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.rows_processed(), 3);
    }

    #[test]
    fn duplicate_rows_create_one_product() {
        let repo = TestRepository::default();
        let report = run(
            &repo,
            &fetcher(),
            vec![
                row("Echo Dot", "Amazon", "Speakers"),
                row(" echo dot ", "AMAZON", "Speakers"),
            ],
            100,
        );

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);
        let (total, _) = repo.list_products(ProductListQuery::default()).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn stops_at_target() {
        let repo = TestRepository::default();
        let rows = (0..150)
            .map(|i| row(&format!("Speaker {i}"), "Sony", "Speakers"))
            .collect();
        let report = run(&repo, &fetcher(), rows, DEFAULT_TARGET_PRODUCTS);

        assert_eq!(report.created, DEFAULT_TARGET_PRODUCTS);
        assert_eq!(report.rows_processed(), DEFAULT_TARGET_PRODUCTS);
        assert_eq!(repo.products().len(), DEFAULT_TARGET_PRODUCTS);
        assert_eq!(report.samples.len(), SUMMARY_SAMPLES);
    }

    #[test]
    fn stoplist_only_categories_use_fallback() {
        let repo = TestRepository::default();
        run(
            &repo,
            &fetcher(),
            vec![
                row("Echo", "Amazon", "Electronics,Computers"),
                row("Kindle", "Amazon", "All"),
            ],
            100,
        );

        let categories = repo.categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_str(), "Electronics");
        assert!(repo
            .products()
            .iter()
            .all(|p| p.category_id == categories[0].id));
    }

    #[test]
    fn builds_products_from_row_data() {
        let repo = TestRepository::default();
        let fetcher = fetcher();
        let mut echo = row("Echo Dot", "Amazon", "Smart Home,Speakers");
        echo.upc = Some("0".into());
        echo.date_added = Some("2017-03-03T16:56:05Z".into());
        echo.image_urls = Some("https://img.example/echo.jpg,https://img.example/2.jpg".into());
        let mut kindle = row("Kindle", "Amazon", "Tablets");
        kindle.image_urls = Some("https://www.barcodable.com/kindle.jpg".into());

        let report = run(&repo, &fetcher, vec![echo, kindle], 100);

        assert_eq!(report.created, 2);
        assert_eq!(report.images_attached, 1);
        assert_eq!(fetcher.calls.get(), 1);

        let products = repo.products();
        let echo = &products[0];
        assert_eq!(echo.category_name.as_str(), "Smart Home");
        assert!(!echo.description.as_str().contains("UPC:"));
        assert_eq!(echo.created_at.to_string(), "2017-03-03 16:56:05");
        assert_eq!(echo.updated_at, now());
        assert!(echo.price.get() > 0);
        assert_eq!(products[1].category_name.as_str(), "Tablets");
    }

    #[test]
    fn image_failures_do_not_stop_the_import() {
        let repo = TestRepository::default();
        let fetcher = CountingFetcher {
            failing_url: Some("https://img.example/broken.jpg"),
            ..fetcher()
        };
        let mut echo = row("Echo", "Amazon", "Speakers");
        echo.image_urls = Some("https://img.example/broken.jpg".into());
        let mut kindle = row("Kindle", "Amazon", "Tablets");
        kindle.image_urls = Some("https://img.example/kindle.jpg".into());
        let fire = row("Fire TV", "Amazon", "Streaming");

        let report = run(&repo, &fetcher, vec![echo, kindle, fire], 100);

        assert_eq!(report.created, 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.images_attached, 1);
        assert_eq!(fetcher.calls.get(), 2);

        let products = repo.products();
        assert_eq!(products.len(), 3);
        let images = repo.images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].product_id, products[1].id);
    }

    #[test]
    fn import_clears_previous_catalog() {
        let repo = TestRepository::default();
        run(&repo, &fetcher(), vec![row("Echo", "Amazon", "Speakers")], 100);
        run(&repo, &fetcher(), vec![row("Kindle", "Amazon", "Tablets")], 100);

        let products = repo.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name.as_str(), "Kindle");
        assert_eq!(repo.categories().len(), 1);
    }

    #[test]
    fn missing_file_is_fatal_and_leaves_catalog_untouched() {
        let repo = TestRepository::default();
        run(&repo, &fetcher(), vec![row("Echo", "Amazon", "Speakers")], 100);

        let fetcher = fetcher();
        let importer = CsvImporter::new(&repo, &fetcher, 100, Duration::from_secs(10));
        let result = importer.import_file(
            Path::new("/nonexistent/electronics.csv"),
            &mut StdRng::seed_from_u64(1),
        );

        assert!(matches!(result, Err(SeedError::MissingInput(_))));
        assert_eq!(repo.products().len(), 1);
    }

    #[test]
    fn summary_reads_category_counts() {
        let repo = TestRepository::default();
        let report = run(&repo, &fetcher(), vec![row("Echo", "Amazon", "Speakers")], 100);
        assert!(log_summary(&repo, &report).is_ok());
    }
}
