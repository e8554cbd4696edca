use common::error::{AppError, FieldErrors, Res};
use common::http::{Page, PageQuery};
use db::dtos::fleet::DriverResponse;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::fleet::DriverRequest;

pub async fn list_drivers(pool: &PgPool, query: PageQuery) -> Res<Page<DriverResponse>> {
    query.validate()?;
    let count = db::driver::count_drivers(pool).await?;
    let profiles = db::driver::list_profiles(pool, query.limit(), query.offset()).await?;
    Ok(Page::new(query, count, profiles)?.map(DriverResponse::from))
}

pub async fn get_driver(pool: &PgPool, driver_id: Uuid) -> Res<DriverResponse> {
    db::driver::get_profile_by_id(pool, driver_id)
        .await
        .map(DriverResponse::from)
        .map_err(|e| e.not_found_as("Driver"))
}

/// Attaches a driver profile to an existing user account.
pub async fn create_driver(pool: &PgPool, req: &DriverRequest) -> Res<DriverResponse> {
    let mut errors = FieldErrors::new();
    let fields = req.to_new(&mut errors);

    if let Some(user_id) = req.user {
        match db::user::get_user_by_id(pool, user_id).await {
            Ok(_) => {
                if db::driver::exists_driver_for_user(pool, user_id).await? {
                    errors.add("user", "driver with this user already exists.");
                }
            }
            Err(AppError::Database(sqlx::Error::RowNotFound)) => {
                errors.add("user", format!("Invalid pk \"{user_id}\" - object does not exist."));
            }
            Err(e) => return Err(e),
        }
    }
    if !fields.license_number.is_empty()
        && db::driver::exists_driver_by_license(pool, &fields.license_number, None).await?
    {
        errors.add("license_number", "driver with this license number already exists.");
    }
    errors.into_result()?;

    let user_id = req
        .user
        .ok_or_else(|| AppError::field("user", "This field is required."))?;
    let driver = db::driver::insert_driver(pool, user_id, &fields).await?;
    log::info!("Driver {} created for user {}", driver.id, user_id);
    get_driver(pool, driver.id).await
}

pub async fn update_driver(
    pool: &PgPool,
    driver_id: Uuid,
    req: &DriverRequest,
) -> Res<DriverResponse> {
    let current = db::driver::get_driver_by_id(pool, driver_id)
        .await
        .map_err(|e| e.not_found_as("Driver"))?;

    let mut errors = FieldErrors::new();
    let fields = req.merge(&current, &mut errors);
    if !fields.license_number.is_empty()
        && db::driver::exists_driver_by_license(pool, &fields.license_number, Some(driver_id))
            .await?
    {
        errors.add("license_number", "driver with this license number already exists.");
    }
    errors.into_result()?;

    db::driver::update_driver(pool, driver_id, &fields).await?;
    get_driver(pool, driver_id).await
}

pub async fn delete_driver(pool: &PgPool, driver_id: Uuid) -> Res<()> {
    if db::driver::delete_driver(pool, driver_id).await? == 0 {
        return Err(AppError::NotFound("Driver not found".to_string()));
    }
    log::info!("Driver {} deleted", driver_id);
    Ok(())
}
