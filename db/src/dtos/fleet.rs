use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    driver::DriverProfile,
    vehicle::{CapacityUnit, Vehicle},
};

#[derive(Debug, Clone)]
pub struct DriverFields {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub license_number: String,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct VehicleFields {
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub capacity: i32,
    pub capacity_unit: CapacityUnit,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct DriverVehicleCreateRequest {
    pub driver_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub assigned_from: NaiveDate,
    pub assigned_to: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct AssignmentFields {
    pub delivery_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverResponse {
    #[serde(flatten)]
    pub profile: DriverProfile,
    pub full_name: String,
}

impl From<DriverProfile> for DriverResponse {
    fn from(profile: DriverProfile) -> Self {
        DriverResponse {
            full_name: profile.full_name(),
            profile,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub capacity_display: String,
    pub full_model: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        VehicleResponse {
            capacity_display: vehicle.capacity_display(),
            full_model: vehicle.full_model(),
            vehicle,
        }
    }
}
