use common::misc::{Country, non_blank};
use db::{dtos::customer::CustomerFields, models::customer::Customer};
use serde::Deserialize;

/// Body of `PUT /customers/{id}`. Omitted fields keep their stored value,
/// blank strings clear optional ones.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerUpdateRequest {
    pub phone_number: Option<String>,
    pub address_unit: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_postal_code: Option<String>,
    pub address_country: Option<Country>,
    pub company_name: Option<String>,
    pub is_business: Option<bool>,
    pub preferred_pickup_address: Option<String>,
    pub active: Option<bool>,
}

fn merge_optional(update: Option<String>, current: &Option<String>) -> Option<String> {
    match update {
        Some(value) => non_blank(Some(&value)).map(str::to_string),
        None => current.clone(),
    }
}

impl CustomerUpdateRequest {
    pub fn merge(self, current: &Customer) -> CustomerFields {
        CustomerFields {
            phone_number: self
                .phone_number
                .map(|p| p.trim().to_string())
                .unwrap_or_else(|| current.phone_number.clone()),
            address_unit: merge_optional(self.address_unit, &current.address_unit),
            address_street: merge_optional(self.address_street, &current.address_street),
            address_city: merge_optional(self.address_city, &current.address_city),
            address_state: merge_optional(self.address_state, &current.address_state),
            address_postal_code: merge_optional(
                self.address_postal_code,
                &current.address_postal_code,
            ),
            address_country: self.address_country.unwrap_or(current.address_country),
            company_name: merge_optional(self.company_name, &current.company_name),
            is_business: self.is_business.unwrap_or(current.is_business),
            preferred_pickup_address: merge_optional(
                self.preferred_pickup_address,
                &current.preferred_pickup_address,
            ),
            active: self.active.unwrap_or(current.active),
        }
    }
}
