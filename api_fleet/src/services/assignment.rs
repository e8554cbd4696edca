use chrono::{NaiveDate, Utc};
use common::error::{AppError, FieldErrors, Res};
use common::http::{Page, PageQuery};
use db::dtos::fleet::AssignmentFields;
use db::models::{delivery::DeliveryAssignment, vehicle::DriverVehicle};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::fleet::AssignmentRequest;
use crate::services::lookup::missing_as_field;

/// Fills in the driver's current vehicle when a driver is set and no vehicle was given.
/// Leaves the vehicle unset when the driver holds none on `today`.
pub async fn resolve_vehicle(
    pool: &PgPool,
    fields: &mut AssignmentFields,
    today: NaiveDate,
) -> Res<()> {
    let Some(driver_id) = fields.driver_id else {
        return Ok(());
    };
    if fields.vehicle_id.is_some() {
        return Ok(());
    }

    let rows = db::vehicle::get_driver_vehicles_for_driver(pool, driver_id).await?;
    fields.vehicle_id = DriverVehicle::current_vehicle(&rows, today);
    match fields.vehicle_id {
        Some(vehicle_id) => {
            log::debug!("Resolved vehicle {} for driver {}", vehicle_id, driver_id)
        }
        None => log::warn!("Driver {} has no vehicle assigned on {}", driver_id, today),
    }
    Ok(())
}

/// Field errors for referenced rows that do not exist.
async fn check_references(pool: &PgPool, fields: &AssignmentFields) -> Res<()> {
    let mut errors = FieldErrors::new();
    missing_as_field(
        db::delivery::get_delivery_by_id(pool, fields.delivery_id).await,
        "delivery_id",
        "Delivery",
        &mut errors,
    )?;
    if let Some(driver_id) = fields.driver_id {
        missing_as_field(
            db::driver::get_driver_by_id(pool, driver_id).await,
            "driver_id",
            "Driver",
            &mut errors,
        )?;
    }
    if let Some(vehicle_id) = fields.vehicle_id {
        missing_as_field(
            db::vehicle::get_vehicle_by_id(pool, vehicle_id).await,
            "vehicle_id",
            "Vehicle",
            &mut errors,
        )?;
    }
    errors.into_result()
}

pub async fn list_assignments(pool: &PgPool, query: PageQuery) -> Res<Page<DeliveryAssignment>> {
    query.validate()?;
    let count = db::delivery::count_assignments(pool).await?;
    let rows = db::delivery::list_assignments(pool, query.limit(), query.offset()).await?;
    Page::new(query, count, rows)
}

pub async fn get_assignment(pool: &PgPool, assignment_id: Uuid) -> Res<DeliveryAssignment> {
    db::delivery::get_assignment_by_id(pool, assignment_id)
        .await
        .map_err(|e| e.not_found_as("Assignment"))
}

pub async fn create_assignment(pool: &PgPool, req: &AssignmentRequest) -> Res<DeliveryAssignment> {
    let mut fields = req.to_new()?;
    check_references(pool, &fields).await?;
    resolve_vehicle(pool, &mut fields, Utc::now().date_naive()).await?;

    let assignment = db::delivery::insert_assignment(pool, &fields).await?;
    log::info!(
        "Delivery {} assigned to driver {:?} with vehicle {:?}",
        assignment.delivery_id,
        assignment.driver_id,
        assignment.vehicle_id
    );
    Ok(assignment)
}

pub async fn update_assignment(
    pool: &PgPool,
    assignment_id: Uuid,
    req: &AssignmentRequest,
) -> Res<DeliveryAssignment> {
    let current = get_assignment(pool, assignment_id).await?;
    let mut fields = req.merge(&current);
    check_references(pool, &fields).await?;
    resolve_vehicle(pool, &mut fields, Utc::now().date_naive()).await?;

    db::delivery::update_assignment(pool, assignment_id, &fields).await
}

pub async fn delete_assignment(pool: &PgPool, assignment_id: Uuid) -> Res<()> {
    if db::delivery::delete_assignment(pool, assignment_id).await? == 0 {
        return Err(AppError::NotFound("Assignment not found".to_string()));
    }
    Ok(())
}
