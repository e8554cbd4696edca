use chrono::{NaiveDate, NaiveTime};
use db::models::delivery::DeliveryStatus;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

/// Body of the delivery create, update and request endpoints. On update, omitted
/// fields keep their stored value.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryRequest {
    pub customer_id: Option<Uuid>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub same_pickup_as_customer: Option<bool>,
    pub use_preferred_pickup: Option<bool>,
    pub same_dropoff_as_customer: Option<bool>,
    pub item_description: Option<String>,
    pub status: Option<DeliveryStatus>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<NaiveTime>,
    pub special_instructions: Option<String>,
    pub estimated_cost: Option<Decimal>,
}
