use actix_web::{Responder, delete, get, post, put, web};
use common::error::Res;
use common::http::{PageQuery, Success};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::fleet::DriverRequest;
use crate::services;

#[get("")]
pub async fn get_drivers(
    query: web::Query<PageQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::ok(services::driver::list_drivers(pg_pool, query.into_inner()).await?)
}

/// Creates a driver profile for an existing user. Staff only.
///
/// # Input
/// - `user`: id of the account to attach the profile to
/// - `first_name`, `last_name`, `phone_number`, `license_number`, `active`
///
/// # Output
/// - Success: 201 with the driver and its `full_name`
/// - Error: 400 when the user is unknown or already a driver, or the license number is taken
#[post("")]
pub async fn post_driver(
    body: web::Json<DriverRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::created(services::driver::create_driver(pg_pool, &body).await?)
}

#[get("/{id}")]
pub async fn get_driver(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::ok(services::driver::get_driver(pg_pool, path.into_inner()).await?)
}

#[put("/{id}")]
pub async fn put_driver(
    path: web::Path<Uuid>,
    body: web::Json<DriverRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::ok(services::driver::update_driver(pg_pool, path.into_inner(), &body).await?)
}

#[delete("/{id}")]
pub async fn delete_driver(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    services::driver::delete_driver(pg_pool, path.into_inner()).await?;
    Success::no_content()
}
