mod cors;
mod health;

use std::sync::Arc;

use actix_web::{
    App, HttpServer,
    middleware::NormalizePath,
    web::{self},
};
use api_address::services::validator::AddressValidator;
use common::env_config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();

    // init logger
    logger::setup(&config).expect("Failed to set up logger");

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // address validation falls back to local parsing without an API key
    let validator = Arc::new(
        AddressValidator::from_config(&config.geocoding)
            .expect("Failed to set up geocoding client"),
    );

    log::info!(
        "Starting server on {}:{}",
        config.server_host,
        config.server_port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(validator.clone()))
            .wrap(logger::middleware()) // 4th
            .wrap(extractor::middleware()) // 3rd
            .wrap(cors::middleware(&origin)) // 2nd
            .wrap(NormalizePath::trim()) // 1st
            .service(health::get_root)
            .service(
                web::scope("/api")
                    .service(health::get_health)
                    .service(api_auth::mount_token())
                    // public, ahead of the authenticated scopes sharing their prefix
                    .service(api_auth::mount_customer_registration())
                    .service(api_auth::mount_driver_registration())
                    .service(api_delivery::mount_customers().wrap(api_auth::auth_middleware()))
                    .service(api_delivery::mount_deliveries().wrap(api_auth::auth_middleware()))
                    .service(
                        api_fleet::mount_drivers()
                            .wrap(api_auth::staff_middleware())
                            .wrap(api_auth::auth_middleware()),
                    )
                    .service(
                        api_fleet::mount_vehicles()
                            .wrap(api_auth::staff_middleware())
                            .wrap(api_auth::auth_middleware()),
                    )
                    .service(
                        api_fleet::mount_driver_vehicles()
                            .wrap(api_auth::staff_middleware())
                            .wrap(api_auth::auth_middleware()),
                    )
                    .service(
                        api_fleet::mount_assignments()
                            .wrap(api_auth::staff_middleware())
                            .wrap(api_auth::auth_middleware()),
                    )
                    .service(
                        api_address::mount_address_validation()
                            .wrap(api_auth::auth_middleware()),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
