use chrono::NaiveDate;
use common::error::{AppError, FieldErrors, Res};
use db::dtos::fleet::{AssignmentFields, DriverFields, DriverVehicleCreateRequest, VehicleFields};
use db::models::{
    delivery::DeliveryAssignment,
    driver::Driver,
    vehicle::{CapacityUnit, Vehicle},
};
use serde::Deserialize;
use uuid::Uuid;

const VIN_MAX_LENGTH: usize = 17;

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn trimmed_or(value: &Option<String>, current: &str) -> String {
    match value {
        Some(v) => v.trim().to_string(),
        None => current.to_string(),
    }
}

/// Body of `POST /drivers` and `PUT /drivers/{id}`. `user` is only read on create.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DriverRequest {
    pub user: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub license_number: Option<String>,
    pub active: Option<bool>,
}

impl DriverRequest {
    pub fn to_new(&self, errors: &mut FieldErrors) -> DriverFields {
        if self.user.is_none() {
            errors.add("user", "This field is required.");
        }
        let fields = DriverFields {
            first_name: trimmed(&self.first_name),
            last_name: trimmed(&self.last_name),
            phone_number: trimmed(&self.phone_number),
            license_number: trimmed(&self.license_number),
            active: self.active.unwrap_or(true),
        };
        check_driver(&fields, errors);
        fields
    }

    pub fn merge(&self, current: &Driver, errors: &mut FieldErrors) -> DriverFields {
        let fields = DriverFields {
            first_name: trimmed_or(&self.first_name, &current.first_name),
            last_name: trimmed_or(&self.last_name, &current.last_name),
            phone_number: trimmed_or(&self.phone_number, &current.phone_number),
            license_number: trimmed_or(&self.license_number, &current.license_number),
            active: self.active.unwrap_or(current.active),
        };
        check_driver(&fields, errors);
        fields
    }
}

fn check_driver(fields: &DriverFields, errors: &mut FieldErrors) {
    errors.require("phone_number", Some(&fields.phone_number));
    errors.require("license_number", Some(&fields.license_number));
}

/// Body of `POST /vehicles` and `PUT /vehicles/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VehicleRequest {
    pub license_plate: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vin: Option<String>,
    pub capacity: Option<i32>,
    pub capacity_unit: Option<CapacityUnit>,
    pub active: Option<bool>,
}

impl VehicleRequest {
    pub fn to_new(&self, errors: &mut FieldErrors) -> VehicleFields {
        if self.year.is_none() {
            errors.add("year", "This field is required.");
        }
        if self.capacity.is_none() {
            errors.add("capacity", "This field is required.");
        }
        let fields = VehicleFields {
            license_plate: trimmed(&self.license_plate),
            make: trimmed(&self.make),
            model: trimmed(&self.model),
            year: self.year.unwrap_or(1),
            vin: trimmed(&self.vin),
            capacity: self.capacity.unwrap_or_default(),
            capacity_unit: self.capacity_unit.unwrap_or_default(),
            active: self.active.unwrap_or(true),
        };
        check_vehicle(&fields, errors);
        fields
    }

    pub fn merge(&self, current: &Vehicle, errors: &mut FieldErrors) -> VehicleFields {
        let fields = VehicleFields {
            license_plate: trimmed_or(&self.license_plate, &current.license_plate),
            make: trimmed_or(&self.make, &current.make),
            model: trimmed_or(&self.model, &current.model),
            year: self.year.unwrap_or(current.year),
            vin: trimmed_or(&self.vin, &current.vin),
            capacity: self.capacity.unwrap_or(current.capacity),
            capacity_unit: self.capacity_unit.unwrap_or(current.capacity_unit),
            active: self.active.unwrap_or(current.active),
        };
        check_vehicle(&fields, errors);
        fields
    }
}

fn check_vehicle(fields: &VehicleFields, errors: &mut FieldErrors) {
    errors.require("license_plate", Some(&fields.license_plate));
    errors.require("make", Some(&fields.make));
    errors.require("model", Some(&fields.model));
    errors.require("vin", Some(&fields.vin));
    if fields.vin.chars().count() > VIN_MAX_LENGTH {
        errors.add(
            "vin",
            format!("Ensure this field has no more than {VIN_MAX_LENGTH} characters."),
        );
    }
    if fields.year < 1 {
        errors.add("year", "Ensure this value is greater than or equal to 1.");
    }
    if fields.capacity < 0 {
        errors.add("capacity", "Ensure this value is greater than or equal to 0.");
    }
}

/// Body of `POST /driver-vehicles`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DriverVehicleRequest {
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub assigned_from: Option<NaiveDate>,
    pub assigned_to: Option<NaiveDate>,
}

impl TryFrom<DriverVehicleRequest> for DriverVehicleCreateRequest {
    type Error = AppError;

    fn try_from(req: DriverVehicleRequest) -> Res<Self> {
        let mut errors = FieldErrors::new();
        if req.driver_id.is_none() {
            errors.add("driver_id", "This field is required.");
        }
        if req.assigned_from.is_none() {
            errors.add("assigned_from", "This field is required.");
        }
        if let (Some(from), Some(to)) = (req.assigned_from, req.assigned_to) {
            if to < from {
                errors.add("assigned_to", "Must not be earlier than assigned_from.");
            }
        }

        match (req.driver_id, req.assigned_from) {
            (Some(driver_id), Some(assigned_from)) if errors.is_empty() => {
                Ok(DriverVehicleCreateRequest {
                    driver_id,
                    vehicle_id: req.vehicle_id,
                    assigned_from,
                    assigned_to: req.assigned_to,
                })
            }
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// `?driver_id=` filter for `GET /driver-vehicles`.
#[derive(Debug, Default, Deserialize)]
pub struct DriverFilter {
    pub driver_id: Option<Uuid>,
}

/// Body of `POST /assignments` and `PUT /assignments/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssignmentRequest {
    pub delivery_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
}

impl AssignmentRequest {
    pub fn to_new(&self) -> Res<AssignmentFields> {
        let delivery_id = self
            .delivery_id
            .ok_or_else(|| AppError::field("delivery_id", "This field is required."))?;
        Ok(AssignmentFields {
            delivery_id,
            driver_id: self.driver_id,
            vehicle_id: self.vehicle_id,
        })
    }

    /// Lays the request over the stored assignment. Switching to another driver
    /// without naming a vehicle drops the old driver's vehicle.
    pub fn merge(&self, current: &DeliveryAssignment) -> AssignmentFields {
        let driver_id = self.driver_id.or(current.driver_id);
        let vehicle_id = match self.vehicle_id {
            Some(vehicle_id) => Some(vehicle_id),
            None if driver_id == current.driver_id => current.vehicle_id,
            None => None,
        };
        AssignmentFields {
            delivery_id: self.delivery_id.unwrap_or(current.delivery_id),
            driver_id,
            vehicle_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    fn epoch() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn van() -> VehicleRequest {
        VehicleRequest {
            license_plate: Some("ABC-123".to_string()),
            make: Some("Ford".to_string()),
            model: Some("Transit".to_string()),
            year: Some(2022),
            vin: Some("1FTBR1C82MKA12345".to_string()),
            capacity: Some(1500),
            capacity_unit: Some(CapacityUnit::Kg),
            active: None,
        }
    }

    #[test]
    fn complete_vehicle_request_is_accepted() {
        let mut errors = FieldErrors::new();
        let fields = van().to_new(&mut errors);
        assert!(errors.is_empty(), "{errors}");
        assert!(fields.active);
        assert_eq!(fields.capacity_unit, CapacityUnit::Kg);
    }

    #[test]
    fn vehicle_request_reports_every_bad_field() {
        let req = VehicleRequest {
            vin: Some("X".repeat(18)),
            capacity: Some(-5),
            ..Default::default()
        };
        let mut errors = FieldErrors::new();
        req.to_new(&mut errors);
        for field in ["license_plate", "make", "model", "year", "vin", "capacity"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn vehicle_update_keeps_omitted_fields() {
        let mut errors = FieldErrors::new();
        let stored = van().to_new(&mut errors);
        let current = Vehicle {
            id: Uuid::new_v4(),
            license_plate: stored.license_plate,
            make: stored.make,
            model: stored.model,
            year: stored.year,
            vin: stored.vin,
            capacity: stored.capacity,
            capacity_unit: stored.capacity_unit,
            active: stored.active,
            created_at: epoch(),
        };
        let update = VehicleRequest {
            capacity_unit: Some(CapacityUnit::Lb),
            ..Default::default()
        };
        let fields = update.merge(&current, &mut errors);
        assert!(errors.is_empty());
        assert_eq!(fields.capacity_unit, CapacityUnit::Lb);
        assert_eq!(fields.vin, "1FTBR1C82MKA12345");
    }

    #[test]
    fn driver_create_needs_user_and_license() {
        let mut errors = FieldErrors::new();
        DriverRequest {
            phone_number: Some("555-0100".to_string()),
            ..Default::default()
        }
        .to_new(&mut errors);
        assert!(errors.contains("user"));
        assert!(errors.contains("license_number"));
        assert!(!errors.contains("phone_number"));
    }

    #[test]
    fn driver_vehicle_range_must_be_ordered() {
        let date = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        let req = DriverVehicleRequest {
            driver_id: Some(Uuid::new_v4()),
            vehicle_id: None,
            assigned_from: Some(date(10)),
            assigned_to: Some(date(9)),
        };
        match DriverVehicleCreateRequest::try_from(req) {
            Err(AppError::Validation(errors)) => assert!(errors.contains("assigned_to")),
            other => panic!("expected validation error, got {other:?}"),
        }

        let open_ended = DriverVehicleRequest {
            driver_id: Some(Uuid::new_v4()),
            vehicle_id: Some(Uuid::new_v4()),
            assigned_from: Some(date(10)),
            assigned_to: None,
        };
        assert!(DriverVehicleCreateRequest::try_from(open_ended).is_ok());
    }

    #[test]
    fn assignment_needs_a_delivery() {
        assert!(AssignmentRequest::default().to_new().is_err());
    }

    #[test]
    fn changing_driver_drops_the_previous_vehicle() {
        let current = DeliveryAssignment {
            id: Uuid::new_v4(),
            delivery_id: Uuid::new_v4(),
            driver_id: Some(Uuid::new_v4()),
            vehicle_id: Some(Uuid::new_v4()),
            assigned_at: epoch(),
        };

        let same_driver = AssignmentRequest::default().merge(&current);
        assert_eq!(same_driver.vehicle_id, current.vehicle_id);

        let new_driver = AssignmentRequest {
            driver_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
        .merge(&current);
        assert_eq!(new_driver.vehicle_id, None);
        assert_eq!(new_driver.delivery_id, current.delivery_id);
    }
}
