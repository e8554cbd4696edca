use actix_web::{Responder, get, post, web};
use common::error::Res;
use common::http::{PageQuery, Success};
use common::jwt::JwtClaims;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::address::{AutocompleteQuery, AutocompleteResponse, LogFilter, ValidateRequest};
use crate::services;
use crate::services::validator::AddressValidator;

/// Validates a free-text address.
///
/// Geocoder problems never fail the request: the address falls back to local
/// parsing and the failed attempt shows up in the validation logs.
///
/// # Frontend Example
/// ```javascript
/// const res = await fetch('/api/address-validation/validate', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json', Authorization: `Bearer ${access}` },
///   body: JSON.stringify({ address: '123 Main St, Springfield, IL 62701', country_hint: 'US' })
/// });
/// const { validation_status, confidence_score, formatted_address } = await res.json();
/// ```
///
/// # Output
/// - Success: 201 with the validated address
/// - Error: 400 when `address` is blank
#[post("/validate")]
pub async fn post_validate(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<ValidateRequest>,
    pool: web::Data<Arc<PgPool>>,
    validator: web::Data<Arc<AddressValidator>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let address =
        services::address::validate_address(pg_pool, &validator, &claims, body.into_inner())
            .await?;
    Success::created(address)
}

#[get("/statistics")]
pub async fn get_statistics(pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let stats = services::address::statistics(pg_pool).await?;
    Success::ok(stats)
}

#[get("/validated-addresses")]
pub async fn get_addresses(
    query: web::Query<PageQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let page = services::address::list_addresses(pg_pool, query.into_inner()).await?;
    Success::ok(page)
}

#[get("/validated-addresses/{id}")]
pub async fn get_address(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let address = services::address::get_address(pg_pool, path.into_inner()).await?;
    Success::ok(address)
}

/// Validation attempts, newest first. `?address_id=` narrows to one address.
#[get("/validation-logs")]
pub async fn get_logs(
    query: web::Query<PageQuery>,
    filter: web::Query<LogFilter>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let page =
        services::address::list_logs(pg_pool, filter.address_id, query.into_inner()).await?;
    Success::ok(page)
}

#[get("/validation-logs/{id}")]
pub async fn get_log(path: web::Path<Uuid>, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let log = services::address::get_log(pg_pool, path.into_inner()).await?;
    Success::ok(log)
}

/// Place predictions for a partially typed address. Empty when no geocoder is configured.
#[get("/autocomplete")]
pub async fn get_autocomplete(
    query: web::Query<AutocompleteQuery>,
    validator: web::Data<Arc<AddressValidator>>,
) -> Res<impl Responder> {
    let predictions = validator.autocomplete(&query.input, &query.country).await;
    Success::ok(AutocompleteResponse { predictions })
}
