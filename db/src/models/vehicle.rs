use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use common::misc::UnknownVariant;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CapacityUnit {
    #[default]
    Kg,
    Lb,
}

impl CapacityUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityUnit::Kg => "kg",
            CapacityUnit::Lb => "lb",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CapacityUnit::Kg => "Kilograms",
            CapacityUnit::Lb => "Pounds",
        }
    }
}

impl FromStr for CapacityUnit {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(CapacityUnit::Kg),
            "lb" => Ok(CapacityUnit::Lb),
            _ => Err(UnknownVariant {
                kind: "capacity unit",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for CapacityUnit {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub capacity: i32,
    #[sqlx(try_from = "String")]
    pub capacity_unit: CapacityUnit,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl Vehicle {
    /// e.g. "1500 Kilograms"
    pub fn capacity_display(&self) -> String {
        format!("{} {}", self.capacity, self.capacity_unit.label())
    }

    pub fn full_model(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

/// A vehicle handed to a driver over a date range. `assigned_to = None` is open-ended.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct DriverVehicle {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub assigned_from: NaiveDate,
    pub assigned_to: Option<NaiveDate>,
}

impl DriverVehicle {
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.assigned_from <= day && self.assigned_to.is_none_or(|to| to >= day)
    }

    /// Picks the vehicle a driver holds on `day`: among the rows covering that day,
    /// the one with the latest `assigned_from`. A winning row whose vehicle was
    /// deleted yields `None`.
    pub fn current_vehicle(rows: &[DriverVehicle], day: NaiveDate) -> Option<Uuid> {
        rows.iter()
            .filter(|row| row.is_active_on(day))
            .max_by_key(|row| row.assigned_from)
            .and_then(|row| row.vehicle_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(vehicle: Option<Uuid>, from: &str, to: Option<&str>) -> DriverVehicle {
        DriverVehicle {
            id: Uuid::new_v4(),
            driver_id: Uuid::nil(),
            vehicle_id: vehicle,
            assigned_from: date(from),
            assigned_to: to.map(date),
        }
    }

    fn vehicle(capacity: i32, unit: CapacityUnit) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            license_plate: "TEST123".to_string(),
            make: "Ford".to_string(),
            model: "Transit".to_string(),
            year: 2023,
            vin: "1HGBH41JXMN109186".to_string(),
            capacity,
            capacity_unit: unit,
            active: true,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn capacity_and_model_display() {
        assert_eq!(vehicle(1500, CapacityUnit::Kg).capacity_display(), "1500 Kilograms");
        assert_eq!(vehicle(2000, CapacityUnit::Lb).capacity_display(), "2000 Pounds");
        assert_eq!(vehicle(1, CapacityUnit::Kg).full_model(), "Ford Transit");
        assert!("ton".parse::<CapacityUnit>().is_err());
    }

    #[test]
    fn open_ended_assignment_is_current() {
        let v = Uuid::new_v4();
        let rows = vec![row(Some(v), "2024-01-01", None)];
        assert_eq!(DriverVehicle::current_vehicle(&rows, date("2025-06-01")), Some(v));
    }

    #[test]
    fn most_recent_active_assignment_wins() {
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        let rows = vec![
            row(Some(old), "2024-01-01", None),
            row(Some(new), "2025-03-01", Some("2025-12-31")),
        ];
        assert_eq!(DriverVehicle::current_vehicle(&rows, date("2025-06-01")), Some(new));
        assert_eq!(DriverVehicle::current_vehicle(&rows, date("2025-02-01")), Some(old));
    }

    #[test]
    fn ended_and_future_assignments_are_ignored() {
        let rows = vec![
            row(Some(Uuid::new_v4()), "2024-01-01", Some("2024-12-31")),
            row(Some(Uuid::new_v4()), "2026-01-01", None),
        ];
        assert_eq!(DriverVehicle::current_vehicle(&rows, date("2025-06-01")), None);
    }

    #[test]
    fn boundaries_are_inclusive() {
        let v = Uuid::new_v4();
        let r = row(Some(v), "2025-01-01", Some("2025-01-31"));
        assert!(r.is_active_on(date("2025-01-01")));
        assert!(r.is_active_on(date("2025-01-31")));
        assert!(!r.is_active_on(date("2025-02-01")));
    }

    #[test]
    fn deleted_vehicle_leaves_nothing() {
        let rows = vec![
            row(Some(Uuid::new_v4()), "2024-01-01", None),
            row(None, "2025-01-01", None),
        ];
        assert_eq!(DriverVehicle::current_vehicle(&rows, date("2025-06-01")), None);
    }
}
