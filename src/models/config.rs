//! Application configuration loaded from `config/default.yaml` and the
//! environment.

use serde::Deserialize;

/// Configuration shared by the HTTP server and the seed binary.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite database path.
    pub database_url: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Bind address of the HTTP read API.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Options of the seed/import pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// CSV file with electronics listings.
    pub csv_path: String,
    /// Maximum number of products created from the CSV.
    pub target_products: usize,
    /// Read timeout for image downloads.
    pub image_timeout_secs: u64,
    /// Run the web scraping step after the CSV import.
    pub scrape_enabled: bool,
    /// Listings page scraped for additional products.
    pub scrape_url: String,
    /// Category receiving every scraped product.
    pub scrape_category: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            csv_path: "db/electronics.csv".to_string(),
            target_products: 100,
            image_timeout_secs: 10,
            scrape_enabled: true,
            scrape_url: "https://webscraper.io/test-sites/e-commerce/allinone/computers/laptops"
                .to_string(),
            scrape_category: "Web Laptops".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional YAML file and `APP__*` variables.
    ///
    /// `DATABASE_URL` is honoured when `database_url` is not configured.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            );

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            builder = builder.set_default("database_url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Address passed to `HttpServer::bind`.
    pub fn server_address(&self) -> (String, u16) {
        (self.server.address.clone(), self.server.port)
    }
}
