//! Secondary seeding pass over a public listings page.

use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

use crate::domain::product::NewProduct;
use crate::domain::types::{
    CategoryId, CategoryName, PriceCents, ProductDescription, ProductName, TypeConstraintError,
};
use crate::repository::errors::RepositoryError;
use crate::repository::{CategoryWriter, ProductImageWriter, ProductReader, ProductWriter};
use crate::seed::description::truncate_description;
use crate::seed::fetch::{FetchError, HttpFetch};
use crate::seed::images::ImageFetcher;

pub const DEFAULT_SCRAPED_DESCRIPTION: &str = "Web-scraped product";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid selector: {0}")]
    Selector(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One product card as found on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedListing {
    pub name: Option<String>,
    pub price_text: Option<String>,
    pub description: Option<String>,
    /// Absolute image URL.
    pub image_url: Option<String>,
}

impl ScrapedListing {
    pub fn price(&self) -> Option<f64> {
        self.price_text.as_deref().and_then(parse_price)
    }
}

/// Parse a displayed price such as `$1,178.99`, ignoring everything except
/// digits and dots.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}

struct CardSelectors {
    card: Selector,
    title: Selector,
    price: Selector,
    description: Selector,
    image: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self, ScrapeError> {
        let parse = |s: &str| Selector::parse(s).map_err(|e| ScrapeError::Selector(e.to_string()));
        Ok(Self {
            card: parse(".thumbnail")?,
            title: parse(".title")?,
            price: parse(".price")?,
            description: parse(".description")?,
            image: parse("img")?,
        })
    }
}

fn text_of(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Extract product cards from a listings page. Relative image sources are
/// resolved against `base`.
pub fn parse_listings(html: &str, base: &Url) -> Result<Vec<ScrapedListing>, ScrapeError> {
    let selectors = CardSelectors::new()?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selectors.card)
        .map(|card| ScrapedListing {
            name: text_of(card, &selectors.title),
            price_text: text_of(card, &selectors.price),
            description: text_of(card, &selectors.description),
            image_url: card
                .select(&selectors.image)
                .next()
                .and_then(|img| img.value().attr("src"))
                .and_then(|src| base.join(src).ok())
                .map(String::from),
        })
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub found: usize,
    pub created: usize,
    pub skipped: usize,
}

pub struct WebScraper<'a, R: ?Sized, F: ?Sized> {
    repo: &'a R,
    fetcher: &'a F,
    images: ImageFetcher<'a, F>,
}

impl<'a, R, F> WebScraper<'a, R, F>
where
    R: CategoryWriter + ProductReader + ProductWriter + ProductImageWriter + ?Sized,
    F: HttpFetch + ?Sized,
{
    pub fn new(repo: &'a R, fetcher: &'a F, image_timeout: Duration) -> Self {
        Self {
            repo,
            fetcher,
            images: ImageFetcher::new(fetcher, image_timeout),
        }
    }

    /// Fetch `page_url` and create a product in `category` for every new
    /// listing. Fails only when the page itself cannot be fetched or parsed.
    pub fn scrape(
        &self,
        page_url: &str,
        category: &CategoryName,
    ) -> Result<ScrapeReport, ScrapeError> {
        let base = Url::parse(page_url)?;
        log::info!("Scraping additional products from {base}");

        let body = self.fetcher.fetch(base.as_str(), None)?;
        let listings = parse_listings(&String::from_utf8_lossy(&body), &base)?;
        log::info!("Found {} listings", listings.len());

        self.seed_listings(&listings, category, Utc::now().naive_utc())
    }

    pub fn seed_listings(
        &self,
        listings: &[ScrapedListing],
        category_name: &CategoryName,
        now: NaiveDateTime,
    ) -> Result<ScrapeReport, ScrapeError> {
        let category = self.repo.find_or_create_category(category_name, now)?;
        let mut report = ScrapeReport {
            found: listings.len(),
            ..ScrapeReport::default()
        };

        for listing in listings {
            let (Some(name), Some(price)) = (listing.name.as_deref(), listing.price()) else {
                report.skipped += 1;
                continue;
            };

            let new_product = match build_product(listing, name, price, category.id, now) {
                Ok(product) => product,
                Err(e) => {
                    log::warn!("Skipping scraped listing {name}: {e}");
                    report.skipped += 1;
                    continue;
                }
            };

            match self
                .repo
                .product_exists_in_category(&new_product.name, category.id)
            {
                Ok(false) => {}
                Ok(true) => {
                    log::debug!("Scraped product already exists: {name}");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    log::warn!("Failed to check scraped product {name}: {e}");
                    report.skipped += 1;
                    continue;
                }
            }

            let product = match self.repo.create_product(&new_product) {
                Ok(product) => product,
                Err(e) => {
                    log::warn!("Failed to create scraped product {name}: {e}");
                    report.skipped += 1;
                    continue;
                }
            };
            log::info!("Created scraped product: {} - {}", product.name, product.price);
            report.created += 1;

            self.images
                .attach_and_log(self.repo, &product, listing.image_url.as_deref());
        }

        Ok(report)
    }
}

fn build_product(
    listing: &ScrapedListing,
    name: &str,
    price: f64,
    category_id: CategoryId,
    now: NaiveDateTime,
) -> Result<NewProduct, TypeConstraintError> {
    let description = listing
        .description
        .as_deref()
        .unwrap_or(DEFAULT_SCRAPED_DESCRIPTION);

    Ok(NewProduct {
        category_id,
        name: ProductName::new(name)?,
        description: ProductDescription::new(truncate_description(description))?,
        price: PriceCents::from_amount(price)?,
        sale_price: None,
        created_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;
    use chrono::DateTime;
    use std::cell::RefCell;

    const PAGE: &str = r#"
        <html><body>
          <div class="thumbnail">
            <img class="img-responsive" src="/images/test-sites/e-commerce/items/cart2.png">
            <div class="caption">
              <h4 class="pull-right price">$295.99</h4>
              <h4><a href="/product/545" class="title" title="Asus VivoBook X441NA">Asus VivoBook X4...</a></h4>
              <p class="description">Asus VivoBook X441NA-GA190 Chocolate Black, 14"</p>
            </div>
          </div>
          <div class="thumbnail">
            <div class="caption">
              <h4 class="price">$1,178.99</h4>
              <h4><a class="title">Lenovo ThinkPad</a></h4>
            </div>
          </div>
          <div class="thumbnail">
            <div class="caption"><h4 class="price">call us</h4><a class="title">Mystery</a></div>
          </div>
          <div class="thumbnail"><h4 class="price">$10</h4></div>
        </body></html>
    "#;

    struct PageFetcher {
        page: Option<&'static str>,
        requests: RefCell<Vec<String>>,
    }

    impl HttpFetch for PageFetcher {
        fn fetch(&self, url: &str, _timeout: Option<Duration>) -> Result<Vec<u8>, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            if url.ends_with(".png") {
                return Ok(vec![0x89, 0x50]);
            }
            match self.page {
                Some(page) => Ok(page.as_bytes().to_vec()),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 503,
                }),
            }
        }
    }

    fn base() -> Url {
        Url::parse("https://webscraper.io/test-sites/e-commerce/allinone/computers/laptops")
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap().naive_utc()
    }

    #[test]
    fn parses_prices() {
        assert_eq!(parse_price("$295.99"), Some(295.99));
        assert_eq!(parse_price("$1,178.99"), Some(1178.99));
        assert_eq!(parse_price("call us"), None);
        assert_eq!(parse_price("1.2.3"), None);
    }

    #[test]
    fn extracts_cards() {
        let listings = parse_listings(PAGE, &base()).unwrap();

        assert_eq!(listings.len(), 4);
        assert_eq!(listings[0].name.as_deref(), Some("Asus VivoBook X4..."));
        assert_eq!(listings[0].price(), Some(295.99));
        assert_eq!(
            listings[0].image_url.as_deref(),
            Some("https://webscraper.io/images/test-sites/e-commerce/items/cart2.png")
        );
        assert_eq!(listings[1].description, None);
        assert_eq!(listings[1].image_url, None);
        assert_eq!(listings[2].price(), None);
        assert_eq!(listings[3].name, None);
    }

    #[test]
    fn seeds_new_listings_into_dedicated_category() {
        let repo = TestRepository::default();
        let fetcher = PageFetcher {
            page: Some(PAGE),
            requests: RefCell::new(Vec::new()),
        };
        let scraper = WebScraper::new(&repo, &fetcher, Duration::from_secs(10));
        let category = CategoryName::new("Web Laptops").unwrap();

        let report = scraper.scrape(base().as_str(), &category).unwrap();

        assert_eq!(
            report,
            ScrapeReport {
                found: 4,
                created: 2,
                skipped: 2
            }
        );
        let products = repo.products();
        assert!(products.iter().all(|p| p.category_name == category));
        assert_eq!(products[1].description.as_str(), DEFAULT_SCRAPED_DESCRIPTION);
        assert_eq!(products[1].price.get(), 117_899);
        assert_eq!(repo.images().len(), 1);

        let again = scraper
            .seed_listings(&parse_listings(PAGE, &base()).unwrap(), &category, now())
            .unwrap();
        assert_eq!(again.created, 0);
        assert_eq!(repo.products().len(), 2);
        assert_eq!(repo.categories().len(), 1);
    }

    #[test]
    fn page_failure_aborts_the_step() {
        let repo = TestRepository::default();
        let fetcher = PageFetcher {
            page: None,
            requests: RefCell::new(Vec::new()),
        };
        let scraper = WebScraper::new(&repo, &fetcher, Duration::from_secs(10));

        let result = scraper.scrape(
            base().as_str(),
            &CategoryName::new("Web Laptops").unwrap(),
        );

        assert!(matches!(result, Err(ScrapeError::Fetch(_))));
        assert!(repo.categories().is_empty());
    }

    #[test]
    fn invalid_page_url_is_rejected() {
        let repo = TestRepository::default();
        let fetcher = PageFetcher {
            page: Some(PAGE),
            requests: RefCell::new(Vec::new()),
        };
        let scraper = WebScraper::new(&repo, &fetcher, Duration::from_secs(10));

        let result = scraper.scrape("not a url", &CategoryName::new("Web Laptops").unwrap());
        assert!(matches!(result, Err(ScrapeError::InvalidUrl(_))));
        assert!(fetcher.requests.borrow().is_empty());
    }
}
