use actix_web::{Responder, delete, get, post, put, web};
use common::error::Res;
use common::http::{PageQuery, Success};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::fleet::VehicleRequest;
use crate::services;

#[get("")]
pub async fn get_vehicles(
    query: web::Query<PageQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::ok(services::vehicle::list_vehicles(pg_pool, query.into_inner()).await?)
}

/// Registers a vehicle.
///
/// # Input
/// - `license_plate`, `make`, `model`, `year`, `vin`, `capacity`,
///   `capacity_unit` (`"kg"` or `"lb"`, default `"kg"`), `active`
///
/// # Output
/// - Success: 201 with the vehicle plus `capacity_display` and `full_model`
/// - Error: 400 when the license plate or VIN already belongs to another vehicle
#[post("")]
pub async fn post_vehicle(
    body: web::Json<VehicleRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::created(services::vehicle::create_vehicle(pg_pool, &body).await?)
}

#[get("/{id}")]
pub async fn get_vehicle(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::ok(services::vehicle::get_vehicle(pg_pool, path.into_inner()).await?)
}

#[put("/{id}")]
pub async fn put_vehicle(
    path: web::Path<Uuid>,
    body: web::Json<VehicleRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::ok(services::vehicle::update_vehicle(pg_pool, path.into_inner(), &body).await?)
}

/// Deletes a vehicle. Driver-vehicle rows and assignments that used it keep a null vehicle.
#[delete("/{id}")]
pub async fn delete_vehicle(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    services::vehicle::delete_vehicle(pg_pool, path.into_inner()).await?;
    Success::no_content()
}
