use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::delivery::DeliveryStatus;

/// Writable delivery columns after pickup/dropoff placement has been applied.
#[derive(Debug, Clone)]
pub struct DeliveryFields {
    pub customer_id: Uuid,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub same_pickup_as_customer: bool,
    pub use_preferred_pickup: bool,
    pub same_dropoff_as_customer: bool,
    pub item_description: String,
    pub status: DeliveryStatus,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<NaiveTime>,
    pub special_instructions: Option<String>,
    pub estimated_cost: Option<Decimal>,
}
