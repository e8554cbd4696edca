use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::fleet::DriverFields,
    models::driver::{Driver, DriverProfile},
};

const PROFILE_SELECT: &str = r#"
    SELECT d.*, u.username, u.first_name AS user_first_name, u.last_name AS user_last_name
    FROM drivers d
    JOIN users u ON u.id = d.user_id
"#;

/// True when another driver already holds `license_number`.
pub async fn exists_driver_by_license<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    license_number: &str,
    exclude: Option<Uuid>,
) -> Res<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM drivers WHERE license_number = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(license_number)
    .bind(exclude)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn exists_driver_for_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM drivers WHERE user_id = $1)")
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn insert_driver<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    data: &DriverFields,
) -> Res<Driver> {
    sqlx::query_as::<_, Driver>(
        r#"
        INSERT INTO drivers (user_id, first_name, last_name, phone_number, license_number, active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.phone_number)
    .bind(&data.license_number)
    .bind(data.active)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_driver_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    driver_id: Uuid,
) -> Res<Driver> {
    sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
        .bind(driver_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_profile_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    driver_id: Uuid,
) -> Res<DriverProfile> {
    sqlx::query_as::<_, DriverProfile>(&format!("{PROFILE_SELECT} WHERE d.id = $1"))
        .bind(driver_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn count_drivers<'e, E: Executor<'e, Database = Postgres>>(executor: E) -> Res<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM drivers")
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_profiles<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Res<Vec<DriverProfile>> {
    sqlx::query_as::<_, DriverProfile>(&format!(
        "{PROFILE_SELECT} ORDER BY d.created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_driver<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    driver_id: Uuid,
    data: &DriverFields,
) -> Res<Driver> {
    sqlx::query_as::<_, Driver>(
        r#"
        UPDATE drivers SET
            first_name = $2, last_name = $3, phone_number = $4, license_number = $5, active = $6
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(driver_id)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.phone_number)
    .bind(&data.license_number)
    .bind(data.active)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_driver<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    driver_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM drivers WHERE id = $1")
        .bind(driver_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}
