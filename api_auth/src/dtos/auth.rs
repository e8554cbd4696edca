use common::misc::Country;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessResponse {
    pub access: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerRegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address_unit: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_postal_code: Option<String>,
    pub address_country: Country,
    pub company_name: Option<String>,
    pub is_business: bool,
    pub preferred_pickup_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DriverRegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub license_number: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerRegistered<T> {
    pub message: &'static str,
    pub customer: T,
}

#[derive(Debug, Serialize)]
pub struct DriverRegistered<T> {
    pub message: &'static str,
    pub driver: T,
}
