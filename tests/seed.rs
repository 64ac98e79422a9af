use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use electronics_catalog::domain::types::CategoryName;
use electronics_catalog::repository::{
    CategoryListQuery, CategoryReader, DieselRepository, ProductImageReader, ProductListQuery,
    ProductReader,
};
use electronics_catalog::seed::SeedError;
use electronics_catalog::seed::fetch::{FetchError, HttpFetch};
use electronics_catalog::seed::importer::{CsvImporter, ImportReport};
use electronics_catalog::seed::web_scraper::WebScraper;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::NamedTempFile;

mod common;

const HEADER: &str = "id,name,brand,categories,dateAdded,dateUpdated,ean,imageURLs,manufacturer,manufacturerNumber,upc,weight,prices.amountMax";

/// Serves a canned listings page and a fixed image body; records every URL.
#[derive(Default)]
struct FakeFetcher {
    page: Option<String>,
    requests: RefCell<Vec<String>>,
}

impl HttpFetch for FakeFetcher {
    fn fetch(&self, url: &str, _timeout: Option<Duration>) -> Result<Vec<u8>, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        if url.ends_with(".jpg") || url.ends_with(".png") {
            return Ok(vec![0xFF, 0xD8, 0xFF, 0xE0]);
        }
        match &self.page {
            Some(page) => Ok(page.clone().into_bytes()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

fn csv_file(rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp csv");
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn import(repo: &DieselRepository, fetcher: &FakeFetcher, path: &Path) -> ImportReport {
    CsvImporter::new(repo, fetcher, 100, Duration::from_secs(10))
        .import_file(path, &mut StdRng::seed_from_u64(99))
        .expect("import should succeed")
}

#[test]
fn imports_csv_into_sqlite() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let fetcher = FakeFetcher::default();
    let file = csv_file(&[
        r#"AV1,Echo Dot,Amazon,"Electronics,Smart Home,Speakers",2017-03-03T16:56:05Z,2018-01-01T00:00:00Z,0,"https://img.example/echo.jpg,https://img.example/echo2.jpg",Amazon,RS400,123456,5.7 oz,49.99"#.to_string(),
        r#"AV2,echo dot ,AMAZON,"Smart Home",,,,https://www.barcodable.com/echo.jpg,,,0,,"#.to_string(),
        r#"AV3,,Amazon,"Tablets",,,,,,,,,"#.to_string(),
        r#"AV4,Galaxy Tab,Samsung,"Computers,Tablets,iPad & Tablets",,,,,,,,,"#.to_string(),
    ]);

    let report = import(&repo, &fetcher, file.path());

    assert_eq!(report.created, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.images_attached, 1);
    assert_eq!(fetcher.requests.borrow().as_slice(), ["https://img.example/echo.jpg"]);

    let (_, categories) = repo.list_categories(CategoryListQuery::default()).unwrap();
    let mut names: Vec<String> = categories.into_iter().map(|c| c.name.into_inner()).collect();
    names.sort();
    assert_eq!(names, vec!["Smart Home", "Speakers", "Tablets", "iPad & Tablets"]);

    let (total, products) = repo.list_products(ProductListQuery::default()).unwrap();
    assert_eq!(total, 2);
    let echo = products
        .iter()
        .find(|p| p.name.as_str() == "Echo Dot")
        .expect("echo should be imported");
    assert_eq!(echo.category_name.as_str(), "Smart Home");
    assert!(echo.description.as_str().contains("UPC: 123456"));
    assert!(!echo.description.as_str().contains("EAN:"));
    assert!(!echo.description.as_str().contains("Manufacturer:"));
    assert!(echo.description.as_str().chars().count() <= 500);
    assert_eq!(echo.created_at.to_string(), "2017-03-03 16:56:05");
    assert!(echo.price.get() > 0);

    let image = repo.get_product_image(echo.id).unwrap().expect("echo image");
    assert_eq!(image.content_type, "image/jpeg");
    assert!(image.filename.starts_with(&format!("product_{}_", echo.id)));
}

#[test]
fn caps_the_import_at_one_hundred_products() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let rows: Vec<String> = (0..130)
        .map(|i| format!("AV{i},Speaker {i},Sony,Speakers,,,,,,,,,"))
        .collect();
    let file = csv_file(&rows);

    let report = import(&repo, &FakeFetcher::default(), file.path());

    assert_eq!(report.created, 100);
    assert_eq!(report.rows_processed(), 100);
    let (total, _) = repo.list_products(ProductListQuery::default()).unwrap();
    assert_eq!(total, 100);
}

#[test]
fn stoplist_only_categories_fall_back_to_electronics() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let file = csv_file(&[
        r#"AV1,Echo,Amazon,"Electronics,Computers",,,,,,,,,"#.to_string(),
        r#"AV2,Fire TV,Amazon,"All,Name Brands,42",,,,,,,,,"#.to_string(),
    ]);

    import(&repo, &FakeFetcher::default(), file.path());

    let (total, categories) = repo.list_categories(CategoryListQuery::default()).unwrap();
    assert_eq!(total, 1);
    assert_eq!(categories[0].name.as_str(), "Electronics");
    let counts = repo.count_products_by_category().unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].1, 2);
}

#[test]
fn rows_missing_trailing_columns_are_still_imported() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let mut file = NamedTempFile::new().expect("temp csv");
    write!(file, "name,brand,categories\nKindle,Amazon\n").unwrap();
    file.flush().unwrap();

    let report = import(&repo, &FakeFetcher::default(), file.path());

    assert_eq!(report.malformed_rows, 0);
    assert_eq!(report.created, 1);
    let (_, products) = repo.list_products(ProductListQuery::default()).unwrap();
    assert_eq!(products[0].name.as_str(), "Kindle");
    assert_eq!(products[0].category_name.as_str(), "Electronics");
}

#[test]
fn reimport_replaces_the_catalog() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let fetcher = FakeFetcher::default();

    let first = csv_file(&["AV1,Echo,Amazon,Speakers,,,,,,,,,".to_string()]);
    import(&repo, &fetcher, first.path());
    let second = csv_file(&["AV2,Kindle,Amazon,Tablets,,,,,,,,,".to_string()]);
    import(&repo, &fetcher, second.path());

    let (_, products) = repo.list_products(ProductListQuery::default()).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name.as_str(), "Kindle");
    assert_eq!(products[0].id.get(), 1);
}

#[test]
fn missing_csv_leaves_database_untouched() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let fetcher = FakeFetcher::default();
    let file = csv_file(&["AV1,Echo,Amazon,Speakers,,,,,,,,,".to_string()]);
    import(&repo, &fetcher, file.path());

    let result = CsvImporter::new(&repo, &fetcher, 100, Duration::from_secs(10))
        .import_file(
            Path::new("/nonexistent/electronics.csv"),
            &mut StdRng::seed_from_u64(1),
        );

    assert!(matches!(result, Err(SeedError::MissingInput(_))));
    let (total, _) = repo.list_products(ProductListQuery::default()).unwrap();
    assert_eq!(total, 1);
}

#[test]
fn scraper_adds_listings_after_import() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let fetcher = FakeFetcher {
        page: Some(
            r#"<div class="thumbnail">
                 <img src="/images/laptop.png">
                 <h4 class="price">$416.99</h4>
                 <a class="title">Acer Aspire 3</a>
                 <p class="description">15.6", Core i3</p>
               </div>"#
                .to_string(),
        ),
        ..FakeFetcher::default()
    };
    let file = csv_file(&["AV1,Echo,Amazon,Speakers,,,,,,,,,".to_string()]);
    import(&repo, &fetcher, file.path());

    let category = CategoryName::new("Web Laptops").unwrap();
    let scraper = WebScraper::new(&repo, &fetcher, Duration::from_secs(10));
    let report = scraper
        .scrape("https://webscraper.io/test-sites/e-commerce/allinone/computers/laptops", &category)
        .expect("scrape should succeed");
    assert_eq!(report.created, 1);

    let again = scraper
        .scrape("https://webscraper.io/test-sites/e-commerce/allinone/computers/laptops", &category)
        .unwrap();
    assert_eq!(again.created, 0);
    assert_eq!(again.skipped, 1);

    let web = repo.get_category_by_name(&category).unwrap().expect("category");
    let (total, products) = repo
        .list_products(ProductListQuery::default().category(web.id))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(products[0].price.get(), 41_699);
    assert_eq!(products[0].description.as_str(), "15.6\", Core i3");
    assert!(repo.get_product_image(products[0].id).unwrap().is_some());
    assert!(
        fetcher
            .requests
            .borrow()
            .contains(&"https://webscraper.io/images/laptop.png".to_string())
    );
}
