use common::error::{AppError, FieldErrors, Res};
use common::http::{Page, PageQuery};
use common::jwt::JwtClaims;
use db::dtos::customer::CustomerResponse;
use db::models::customer::CustomerProfile;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::customer::CustomerUpdateRequest;
use crate::services::access::can_access_profile;

/// Staff see every customer, everyone else only their own profile.
pub async fn list_customers(
    pool: &PgPool,
    claims: &JwtClaims,
    query: PageQuery,
) -> Res<Page<CustomerResponse>> {
    query.validate()?;
    let owner = (!claims.is_staff).then_some(claims.user_id);
    let count = db::customer::count_customers(pool, owner).await?;
    let profiles =
        db::customer::list_profiles(pool, owner, query.limit(), query.offset()).await?;
    Ok(Page::new(query, count, profiles)?.map(CustomerResponse::from))
}

pub async fn get_own_profile(pool: &PgPool, claims: &JwtClaims) -> Res<CustomerResponse> {
    let profile = db::customer::get_profile_by_user(pool, claims.user_id)
        .await
        .map_err(|e| e.not_found_as("Customer profile"))?;
    Ok(CustomerResponse::from(profile))
}

/// Profile the caller may see. Other customers' profiles are reported as missing.
async fn visible_profile(
    pool: &PgPool,
    claims: &JwtClaims,
    customer_id: Uuid,
) -> Res<CustomerProfile> {
    let profile = db::customer::get_profile_by_id(pool, customer_id)
        .await
        .map_err(|e| e.not_found_as("Customer"))?;
    if !can_access_profile(claims, profile.customer.user_id) {
        return Err(AppError::NotFound("Customer not found".to_string()));
    }
    Ok(profile)
}

pub async fn get_customer(
    pool: &PgPool,
    claims: &JwtClaims,
    customer_id: Uuid,
) -> Res<CustomerResponse> {
    visible_profile(pool, claims, customer_id)
        .await
        .map(CustomerResponse::from)
}

pub async fn update_customer(
    pool: &PgPool,
    claims: &JwtClaims,
    customer_id: Uuid,
    req: CustomerUpdateRequest,
) -> Res<CustomerResponse> {
    let current = visible_profile(pool, claims, customer_id).await?.customer;

    let mut fields = req.merge(&current);
    if !claims.is_staff {
        fields.active = current.active;
    }
    let mut errors = FieldErrors::new();
    fields.validate(&mut errors);
    errors.into_result()?;

    db::customer::update_customer(pool, customer_id, &fields).await?;
    let profile = db::customer::get_profile_by_id(pool, customer_id).await?;
    log::info!("Customer {} updated by {}", customer_id, claims.user_id);
    Ok(CustomerResponse::from(profile))
}

pub async fn delete_customer(pool: &PgPool, claims: &JwtClaims, customer_id: Uuid) -> Res<()> {
    if !claims.is_staff {
        return Err(AppError::Forbidden(
            "Only staff can delete customers".to_string(),
        ));
    }
    if db::customer::delete_customer(pool, customer_id).await? == 0 {
        return Err(AppError::NotFound("Customer not found".to_string()));
    }
    log::info!("Customer {} deleted by {}", customer_id, claims.user_id);
    Ok(())
}
