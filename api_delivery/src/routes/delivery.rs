use actix_web::{Responder, delete, get, post, put, web};
use common::error::Res;
use common::http::{PageQuery, Success};
use common::jwt::JwtClaims;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::delivery::DeliveryRequest;
use crate::services;

/// Lists deliveries, newest first. Customers only see their own.
#[get("")]
pub async fn get_deliveries(
    claims: web::ReqData<JwtClaims>,
    query: web::Query<PageQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let page = services::delivery::list_deliveries(pg_pool, &claims, query.into_inner()).await?;
    Success::ok(page)
}

/// Creates a delivery. Staff must name `customer_id`; customers create for themselves.
///
/// Pickup and dropoff are filled from the customer's profile when
/// `same_pickup_as_customer`, `use_preferred_pickup` or `same_dropoff_as_customer` is set.
///
/// # Output
/// - Success: 201 with the stored delivery
/// - Error: 400 when pickup, dropoff or item description end up empty
#[post("")]
pub async fn post_delivery(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<DeliveryRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let delivery =
        services::delivery::create_delivery(pg_pool, &claims, body.into_inner()).await?;
    Success::created(delivery)
}

/// Customer delivery request form.
///
/// # Frontend Example
/// ```javascript
/// await fetch('/api/deliveries/request_delivery', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json', Authorization: `Bearer ${access}` },
///   body: JSON.stringify({
///     pickup_location: '',
///     dropoff_location: '321 New End Ave',
///     item_description: 'Documents',
///     same_pickup_as_customer: true
///   })
/// });
/// ```
#[post("/request_delivery")]
pub async fn post_request_delivery(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<DeliveryRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let delivery =
        services::delivery::request_delivery(pg_pool, &claims, body.into_inner()).await?;
    Success::created(delivery)
}

#[get("/{id}")]
pub async fn get_delivery(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let delivery = services::delivery::get_delivery(pg_pool, &claims, path.into_inner()).await?;
    Success::ok(delivery)
}

/// Updates a delivery. Omitted fields are kept and the placement flags are re-applied.
///
/// 400 for an illegal status change (e.g. `Completed` back to `Pending`),
/// 403 when a customer tries anything but cancelling.
#[put("/{id}")]
pub async fn put_delivery(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    body: web::Json<DeliveryRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let delivery = services::delivery::update_delivery(
        pg_pool,
        &claims,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Success::ok(delivery)
}

#[delete("/{id}")]
pub async fn delete_delivery(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    services::delivery::delete_delivery(pg_pool, &claims, path.into_inner()).await?;
    Success::no_content()
}
