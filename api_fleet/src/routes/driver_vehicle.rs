use actix_web::{Responder, delete, get, post, web};
use common::error::Res;
use common::http::{PageQuery, Success};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::fleet::{DriverFilter, DriverVehicleRequest};
use crate::services;

/// Lists driver-vehicle date ranges, optionally for one driver (`?driver_id=`).
#[get("")]
pub async fn get_driver_vehicles(
    query: web::Query<PageQuery>,
    filter: web::Query<DriverFilter>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let page =
        services::vehicle::list_driver_vehicles(pg_pool, filter.driver_id, query.into_inner())
            .await?;
    Success::ok(page)
}

/// Hands a vehicle to a driver from `assigned_from` until `assigned_to`
/// (open-ended when omitted).
#[post("")]
pub async fn post_driver_vehicle(
    body: web::Json<DriverVehicleRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let row = services::vehicle::create_driver_vehicle(pg_pool, body.into_inner()).await?;
    Success::created(row)
}

#[delete("/{id}")]
pub async fn delete_driver_vehicle(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    services::vehicle::delete_driver_vehicle(pg_pool, path.into_inner()).await?;
    Success::no_content()
}
