use actix_web::{Responder, delete, get, put, web};
use common::error::Res;
use common::http::{PageQuery, Success};
use common::jwt::JwtClaims;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::customer::CustomerUpdateRequest;
use crate::services;

/// Lists customer profiles, 10 per page.
///
/// Staff see every customer; any other caller gets a page holding only their own profile.
///
/// # Output
/// - Success: `{"count": 1, "next": null, "previous": null, "results": [{...}]}`
/// - Error: 404 for a page past the end
#[get("")]
pub async fn get_customers(
    claims: web::ReqData<JwtClaims>,
    query: web::Query<PageQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let page = services::customer::list_customers(pg_pool, &claims, query.into_inner()).await?;
    Success::ok(page)
}

/// Returns the caller's own customer profile, 404 when the account has none.
#[get("/me")]
pub async fn get_me(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    Success::ok(services::customer::get_own_profile(pg_pool, &claims).await?)
}

#[get("/{id}")]
pub async fn get_customer(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let customer = services::customer::get_customer(pg_pool, &claims, path.into_inner()).await?;
    Success::ok(customer)
}

/// Updates a customer profile. Owner or staff; only staff can change `active`.
///
/// # Output
/// - Success: the updated profile
/// - Error: 400 when the postal code does not match the country, 404 for unknown or foreign profiles
#[put("/{id}")]
pub async fn put_customer(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    body: web::Json<CustomerUpdateRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let customer = services::customer::update_customer(
        pg_pool,
        &claims,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Success::ok(customer)
}

/// Deletes a customer and, through the foreign keys, their deliveries. Staff only.
#[delete("/{id}")]
pub async fn delete_customer(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    services::customer::delete_customer(pg_pool, &claims, path.into_inner()).await?;
    Success::no_content()
}
