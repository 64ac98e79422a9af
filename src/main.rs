use std::process::ExitCode;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;

use electronics_catalog::db::{establish_connection_pool, run_migrations};
use electronics_catalog::models::config::AppConfig;
use electronics_catalog::repository::DieselRepository;
use electronics_catalog::routes::api::{
    api_v1_categories, api_v1_category, api_v1_newly_added, api_v1_on_sale, api_v1_product,
    api_v1_product_image, api_v1_products, api_v1_recently_updated,
};
use electronics_catalog::routes::main::{about, contact, up};

#[actix_web::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run migrations: {e}");
        return ExitCode::FAILURE;
    }

    let repo = web::Data::new(DieselRepository::new(pool));
    let address = config.server_address();
    log::info!("Listening on {}:{}", address.0, address.1);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(repo.clone())
            .service(up)
            .service(about)
            .service(contact)
            .service(
                web::scope("/api")
                    // Named listings before `{product_id}` so they are not
                    // captured as ids.
                    .service(api_v1_newly_added)
                    .service(api_v1_recently_updated)
                    .service(api_v1_on_sale)
                    .service(api_v1_products)
                    .service(api_v1_product_image)
                    .service(api_v1_product)
                    .service(api_v1_categories)
                    .service(api_v1_category),
            )
    })
    .bind(address);

    let result = match server {
        Ok(server) => server.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {e}");
            ExitCode::FAILURE
        }
    }
}
