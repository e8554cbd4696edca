use common::error::{AppError, FieldErrors, Res};
use common::http::{Page, PageQuery};
use db::dtos::fleet::{DriverVehicleCreateRequest, VehicleFields, VehicleResponse};
use db::models::vehicle::DriverVehicle;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::fleet::{DriverVehicleRequest, VehicleRequest};
use crate::services::lookup::missing_as_field;

pub async fn list_vehicles(pool: &PgPool, query: PageQuery) -> Res<Page<VehicleResponse>> {
    query.validate()?;
    let count = db::vehicle::count_vehicles(pool).await?;
    let vehicles = db::vehicle::list_vehicles(pool, query.limit(), query.offset()).await?;
    Ok(Page::new(query, count, vehicles)?.map(VehicleResponse::from))
}

pub async fn get_vehicle(pool: &PgPool, vehicle_id: Uuid) -> Res<VehicleResponse> {
    db::vehicle::get_vehicle_by_id(pool, vehicle_id)
        .await
        .map(VehicleResponse::from)
        .map_err(|e| e.not_found_as("Vehicle"))
}

/// Adds a field error for each unique identifier held by another vehicle.
async fn check_conflicts(
    pool: &PgPool,
    fields: &VehicleFields,
    exclude: Option<Uuid>,
    errors: &mut FieldErrors,
) -> Res<()> {
    let conflicts =
        db::vehicle::find_vehicle_conflicts(pool, &fields.license_plate, &fields.vin, exclude)
            .await?;
    if conflicts.plate_taken {
        errors.add("license_plate", "vehicle with this license plate already exists.");
    }
    if conflicts.vin_taken {
        errors.add("vin", "vehicle with this vin already exists.");
    }
    Ok(())
}

pub async fn create_vehicle(pool: &PgPool, req: &VehicleRequest) -> Res<VehicleResponse> {
    let mut errors = FieldErrors::new();
    let fields = req.to_new(&mut errors);
    check_conflicts(pool, &fields, None, &mut errors).await?;
    errors.into_result()?;

    let vehicle = db::vehicle::insert_vehicle(pool, &fields).await?;
    log::info!("Vehicle {} ({}) added", vehicle.id, vehicle.license_plate);
    Ok(VehicleResponse::from(vehicle))
}

pub async fn update_vehicle(
    pool: &PgPool,
    vehicle_id: Uuid,
    req: &VehicleRequest,
) -> Res<VehicleResponse> {
    let current = db::vehicle::get_vehicle_by_id(pool, vehicle_id)
        .await
        .map_err(|e| e.not_found_as("Vehicle"))?;

    let mut errors = FieldErrors::new();
    let fields = req.merge(&current, &mut errors);
    check_conflicts(pool, &fields, Some(vehicle_id), &mut errors).await?;
    errors.into_result()?;

    let vehicle = db::vehicle::update_vehicle(pool, vehicle_id, &fields).await?;
    Ok(VehicleResponse::from(vehicle))
}

pub async fn delete_vehicle(pool: &PgPool, vehicle_id: Uuid) -> Res<()> {
    if db::vehicle::delete_vehicle(pool, vehicle_id).await? == 0 {
        return Err(AppError::NotFound("Vehicle not found".to_string()));
    }
    log::info!("Vehicle {} deleted", vehicle_id);
    Ok(())
}

pub async fn list_driver_vehicles(
    pool: &PgPool,
    driver_id: Option<Uuid>,
    query: PageQuery,
) -> Res<Page<DriverVehicle>> {
    query.validate()?;
    let count = db::vehicle::count_driver_vehicles(pool, driver_id).await?;
    let rows =
        db::vehicle::list_driver_vehicles(pool, driver_id, query.limit(), query.offset()).await?;
    Page::new(query, count, rows)
}

/// Hands a vehicle to a driver for a date range.
pub async fn create_driver_vehicle(pool: &PgPool, req: DriverVehicleRequest) -> Res<DriverVehicle> {
    let data = DriverVehicleCreateRequest::try_from(req)?;

    let mut errors = FieldErrors::new();
    missing_as_field(
        db::driver::get_driver_by_id(pool, data.driver_id).await,
        "driver_id",
        "Driver",
        &mut errors,
    )?;
    if let Some(vehicle_id) = data.vehicle_id {
        missing_as_field(
            db::vehicle::get_vehicle_by_id(pool, vehicle_id).await,
            "vehicle_id",
            "Vehicle",
            &mut errors,
        )?;
    }
    errors.into_result()?;

    let row = db::vehicle::insert_driver_vehicle(pool, &data).await?;
    log::info!(
        "Driver {} assigned vehicle {:?} from {}",
        row.driver_id,
        row.vehicle_id,
        row.assigned_from
    );
    Ok(row)
}

pub async fn delete_driver_vehicle(pool: &PgPool, driver_vehicle_id: Uuid) -> Res<()> {
    if db::vehicle::delete_driver_vehicle(pool, driver_vehicle_id).await? == 0 {
        return Err(AppError::NotFound("Driver vehicle not found".to_string()));
    }
    Ok(())
}
