use serde::Serialize;
use sqlx::types::JsonValue;
use uuid::Uuid;

use crate::models::address::{Components, ValidatedAddress, ValidationSource, ValidationStatus};

/// Result columns written once a validation run finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressResult {
    pub unit: Option<String>,
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub street_type: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub normalized_address: Option<String>,
    pub validation_status: ValidationStatus,
    pub validation_source: ValidationSource,
    pub confidence_score: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AddressResult {
    pub fn components(&self) -> Components<'_> {
        Components {
            unit: &self.unit,
            street_number: &self.street_number,
            street_name: &self.street_name,
            street_type: &self.street_type,
            city: &self.city,
            state_province: &self.state_province,
            postal_code: &self.postal_code,
            country: &self.country,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogCreateRequest {
    pub address_id: Uuid,
    pub validation_source: ValidationSource,
    pub request_data: JsonValue,
    pub response_data: JsonValue,
    pub success: bool,
    pub error_message: Option<String>,
    pub processing_time: f64,
}

#[derive(Debug, Clone, Copy, Default, sqlx::FromRow, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: i64,
    pub valid: i64,
    pub invalid: i64,
    pub partial: i64,
    pub pending: i64,
}

/// Validated address as returned by the API, with its derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct AddressResponse {
    #[serde(flatten)]
    pub address: ValidatedAddress,
    pub formatted_address: String,
    pub is_valid: bool,
}

impl From<ValidatedAddress> for AddressResponse {
    fn from(address: ValidatedAddress) -> Self {
        AddressResponse {
            formatted_address: address.formatted_address(),
            is_valid: address.is_valid(),
            address,
        }
    }
}
