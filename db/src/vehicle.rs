use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::fleet::{DriverVehicleCreateRequest, VehicleFields},
    models::vehicle::{DriverVehicle, Vehicle},
};

/// Which of the unique vehicle identifiers are already taken by another vehicle.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct VehicleConflicts {
    pub plate_taken: bool,
    pub vin_taken: bool,
}

pub async fn find_vehicle_conflicts<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    license_plate: &str,
    vin: &str,
    exclude: Option<Uuid>,
) -> Res<VehicleConflicts> {
    sqlx::query_as::<_, VehicleConflicts>(
        r#"
        SELECT
            EXISTS(SELECT 1 FROM vehicles WHERE license_plate = $1 AND ($3::uuid IS NULL OR id <> $3)) AS plate_taken,
            EXISTS(SELECT 1 FROM vehicles WHERE vin = $2 AND ($3::uuid IS NULL OR id <> $3)) AS vin_taken
        "#,
    )
    .bind(license_plate)
    .bind(vin)
    .bind(exclude)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_vehicle<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: &VehicleFields,
) -> Res<Vehicle> {
    sqlx::query_as::<_, Vehicle>(
        r#"
        INSERT INTO vehicles (license_plate, make, model, year, vin, capacity, capacity_unit, active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&data.license_plate)
    .bind(&data.make)
    .bind(&data.model)
    .bind(data.year)
    .bind(&data.vin)
    .bind(data.capacity)
    .bind(data.capacity_unit.as_str())
    .bind(data.active)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_vehicle_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    vehicle_id: Uuid,
) -> Res<Vehicle> {
    sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
        .bind(vehicle_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn count_vehicles<'e, E: Executor<'e, Database = Postgres>>(executor: E) -> Res<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_vehicles<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Res<Vec<Vehicle>> {
    sqlx::query_as::<_, Vehicle>(
        "SELECT * FROM vehicles ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_vehicle<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    vehicle_id: Uuid,
    data: &VehicleFields,
) -> Res<Vehicle> {
    sqlx::query_as::<_, Vehicle>(
        r#"
        UPDATE vehicles SET
            license_plate = $2, make = $3, model = $4, year = $5, vin = $6,
            capacity = $7, capacity_unit = $8, active = $9
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(vehicle_id)
    .bind(&data.license_plate)
    .bind(&data.make)
    .bind(&data.model)
    .bind(data.year)
    .bind(&data.vin)
    .bind(data.capacity)
    .bind(data.capacity_unit.as_str())
    .bind(data.active)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_vehicle<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    vehicle_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM vehicles WHERE id = $1")
        .bind(vehicle_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}

pub async fn insert_driver_vehicle<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: &DriverVehicleCreateRequest,
) -> Res<DriverVehicle> {
    sqlx::query_as::<_, DriverVehicle>(
        r#"
        INSERT INTO driver_vehicles (driver_id, vehicle_id, assigned_from, assigned_to)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.driver_id)
    .bind(data.vehicle_id)
    .bind(data.assigned_from)
    .bind(data.assigned_to)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Every assignment row of one driver, newest `assigned_from` first.
pub async fn get_driver_vehicles_for_driver<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    driver_id: Uuid,
) -> Res<Vec<DriverVehicle>> {
    sqlx::query_as::<_, DriverVehicle>(
        "SELECT * FROM driver_vehicles WHERE driver_id = $1 ORDER BY assigned_from DESC",
    )
    .bind(driver_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn count_driver_vehicles<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    driver_id: Option<Uuid>,
) -> Res<i64> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM driver_vehicles WHERE ($1::uuid IS NULL OR driver_id = $1)",
    )
    .bind(driver_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn list_driver_vehicles<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    driver_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Res<Vec<DriverVehicle>> {
    sqlx::query_as::<_, DriverVehicle>(
        r#"
        SELECT * FROM driver_vehicles
        WHERE ($1::uuid IS NULL OR driver_id = $1)
        ORDER BY assigned_from DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(driver_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_driver_vehicle<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    driver_vehicle_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM driver_vehicles WHERE id = $1")
        .bind(driver_vehicle_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}
