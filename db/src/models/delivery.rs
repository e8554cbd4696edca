use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use common::misc::UnknownVariant;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeliveryStatus {
    #[default]
    Pending,
    #[serde(rename = "En Route")]
    EnRoute,
    Completed,
    Cancelled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::EnRoute => "En Route",
            DeliveryStatus::Completed => "Completed",
            DeliveryStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Completed | DeliveryStatus::Cancelled)
    }

    /// Pending -> En Route -> Completed, and either open state may be cancelled.
    /// Keeping the current status is always allowed.
    pub fn can_transition_to(&self, next: DeliveryStatus) -> bool {
        use DeliveryStatus::*;
        *self == next
            || matches!(
                (self, next),
                (Pending, EnRoute) | (EnRoute, Completed) | (Pending | EnRoute, Cancelled)
            )
    }
}

impl FromStr for DeliveryStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(DeliveryStatus::Pending),
            "En Route" => Ok(DeliveryStatus::EnRoute),
            "Completed" => Ok(DeliveryStatus::Completed),
            "Cancelled" => Ok(DeliveryStatus::Cancelled),
            _ => Err(UnknownVariant {
                kind: "delivery status",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for DeliveryStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Delivery {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub same_pickup_as_customer: bool,
    pub use_preferred_pickup: bool,
    pub same_dropoff_as_customer: bool,
    pub item_description: String,
    #[sqlx(try_from = "String")]
    pub status: DeliveryStatus,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<NaiveTime>,
    pub special_instructions: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct DeliveryAssignment {
    pub id: Uuid,
    pub delivery_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub assigned_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::DeliveryStatus::*;
    use super::*;

    #[test]
    fn forward_transitions() {
        assert!(Pending.can_transition_to(EnRoute));
        assert!(EnRoute.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(EnRoute.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Completed));
    }

    #[test]
    fn terminal_and_skipping_transitions_are_rejected() {
        assert!(!Pending.can_transition_to(Completed));
        assert!(!EnRoute.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(Cancelled.is_terminal() && !EnRoute.is_terminal());
    }

    #[test]
    fn status_names_match_storage() {
        assert_eq!(serde_json::to_string(&EnRoute).unwrap(), "\"En Route\"");
        assert_eq!("En Route".parse::<DeliveryStatus>().unwrap(), EnRoute);
        assert_eq!(Completed.as_str(), "Completed");
        assert!("Lost".parse::<DeliveryStatus>().is_err());
    }
}
