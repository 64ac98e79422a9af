//! Reset the catalog from the electronics CSV and optionally add scraped
//! listings.

use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use dotenvy::dotenv;
use electronics_catalog::db::{establish_connection_pool, run_migrations};
use electronics_catalog::domain::types::CategoryName;
use electronics_catalog::models::config::AppConfig;
use electronics_catalog::repository::DieselRepository;
use electronics_catalog::seed::fetch::HttpFetcher;
use electronics_catalog::seed::importer::{CsvImporter, log_summary};
use electronics_catalog::seed::web_scraper::WebScraper;

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Seeding aborted: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    let pool = establish_connection_pool(&config.database_url)?;
    run_migrations(&pool)?;

    let repo = DieselRepository::new(pool);
    let fetcher = HttpFetcher::new()?;
    let image_timeout = Duration::from_secs(config.seed.image_timeout_secs);
    let mut rng = rand::thread_rng();

    let importer = CsvImporter::new(
        &repo,
        &fetcher,
        config.seed.target_products,
        image_timeout,
    );
    let report = importer.import_file(Path::new(&config.seed.csv_path), &mut rng)?;
    log_summary(&repo, &report)?;

    if !config.seed.scrape_enabled {
        log::info!("Web scraping disabled");
        return Ok(());
    }

    let category = CategoryName::new(config.seed.scrape_category.as_str())?;
    let scraper = WebScraper::new(&repo, &fetcher, image_timeout);
    match scraper.scrape(&config.seed.scrape_url, &category) {
        Ok(scraped) => log::info!(
            "Web scraping completed: {} listings, {} created, {} skipped",
            scraped.found,
            scraped.created,
            scraped.skipped
        ),
        Err(e) => log::error!("Web scraping failed: {e}"),
    }

    Ok(())
}
