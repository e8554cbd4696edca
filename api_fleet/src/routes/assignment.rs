use actix_web::{Responder, delete, get, post, put, web};
use common::error::Res;
use common::http::{PageQuery, Success};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::fleet::AssignmentRequest;
use crate::services;

#[get("")]
pub async fn get_assignments(
    query: web::Query<PageQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::ok(services::assignment::list_assignments(pg_pool, query.into_inner()).await?)
}

/// Assigns a delivery to a driver.
///
/// When `driver_id` is given without `vehicle_id`, the vehicle the driver holds
/// today is filled in.
///
/// # Output
/// - Success: 201 `{"id", "delivery_id", "driver_id", "vehicle_id", "assigned_at"}`
/// - Error: 400 when the delivery, driver or vehicle does not exist
#[post("")]
pub async fn post_assignment(
    body: web::Json<AssignmentRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::created(services::assignment::create_assignment(pg_pool, &body).await?)
}

#[get("/{id}")]
pub async fn get_assignment(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::ok(services::assignment::get_assignment(pg_pool, path.into_inner()).await?)
}

#[put("/{id}")]
pub async fn put_assignment(
    path: web::Path<Uuid>,
    body: web::Json<AssignmentRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let assignment =
        services::assignment::update_assignment(pg_pool, path.into_inner(), &body).await?;
    Success::ok(assignment)
}

#[delete("/{id}")]
pub async fn delete_assignment(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    services::assignment::delete_assignment(pg_pool, path.into_inner()).await?;
    Success::no_content()
}
