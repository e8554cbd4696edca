use actix_web::{Responder, web};
use common::error::Res;
use common::http::Success;
use db::dtos::customer::CustomerResponse;
use db::dtos::fleet::DriverResponse;
use sqlx::PgPool;
use std::sync::Arc;

use crate::dtos::auth::{
    CustomerRegisterRequest, CustomerRegistered, DriverRegisterRequest, DriverRegistered,
};
use crate::services;

/// Registers a customer account. Public.
///
/// # Input
/// - account fields: `username`, `email`, `password`, `first_name`, `last_name`
/// - profile fields: `phone_number`, `address_*`, `company_name`, `is_business`,
///   `preferred_pickup_address`
///
/// # Output
/// - Success: 201 `{"message": ..., "customer": {...}}`
/// - Error: 400 with per-field messages for missing fields, a postal code that does not
///   match `address_country`, or a username/email already in use
pub async fn post_register_customer(
    req: web::Json<CustomerRegisterRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let profile = services::user::register_customer(pg_pool, &req.into_inner()).await?;
    Success::created(CustomerRegistered {
        message: "Customer registered successfully",
        customer: CustomerResponse::from(profile),
    })
}

/// Registers a driver account. Public.
///
/// 400 when the username, email or license number is already taken.
pub async fn post_register_driver(
    req: web::Json<DriverRegisterRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let profile = services::user::register_driver(pg_pool, &req.into_inner()).await?;
    Success::created(DriverRegistered {
        message: "Driver registered successfully",
        driver: DriverResponse::from(profile),
    })
}
