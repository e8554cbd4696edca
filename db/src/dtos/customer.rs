use common::{
    error::FieldErrors,
    misc::{Country, non_blank},
};
use serde::Serialize;

use crate::models::customer::CustomerProfile;

/// Writable customer columns, shared by insert and update.
#[derive(Debug, Clone, Default)]
pub struct CustomerFields {
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
    pub active: bool,
}

impl CustomerFields {
    /// Checks required fields and the postal code format for the chosen country.
    /// A valid postal code is stored normalized (trimmed, upper-cased).
    pub fn validate(&mut self, errors: &mut FieldErrors) {
        errors.require("phone_number", Some(&self.phone_number));

        if let Some(postal_code) = non_blank(self.address_postal_code.as_deref()) {
            match self.address_country.validate_postal_code(postal_code) {
                Ok(normalized) => self.address_postal_code = Some(normalized),
                Err(message) => errors.add("address_postal_code", message),
            }
        }
    }
}

/// Customer profile as returned by the API, with its derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    #[serde(flatten)]
    pub profile: CustomerProfile,
    pub full_address: String,
    pub display_name: String,
}

impl From<CustomerProfile> for CustomerResponse {
    fn from(profile: CustomerProfile) -> Self {
        CustomerResponse {
            full_address: profile.customer.full_address(),
            display_name: profile.display_name(),
            profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(country: Country, postal_code: &str) -> CustomerFields {
        CustomerFields {
            phone_number: "555-5678".to_string(),
            address_postal_code: Some(postal_code.to_string()),
            address_country: country,
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn postal_code_is_normalized() {
        let mut f = fields(Country::Ca, " k1a 0a6 ");
        let mut errors = FieldErrors::new();
        f.validate(&mut errors);
        assert!(errors.is_empty());
        assert_eq!(f.address_postal_code.as_deref(), Some("K1A 0A6"));
    }

    #[test]
    fn postal_code_must_match_country() {
        let mut errors = FieldErrors::new();
        fields(Country::Ca, "12345").validate(&mut errors);
        assert!(errors.contains("address_postal_code"));

        let mut errors = FieldErrors::new();
        fields(Country::Us, "K1A 0A6").validate(&mut errors);
        assert!(errors.contains("address_postal_code"));
    }

    #[test]
    fn missing_postal_code_skips_the_check() {
        let mut f = fields(Country::Us, "");
        f.address_postal_code = None;
        let mut errors = FieldErrors::new();
        f.validate(&mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn phone_number_is_required() {
        let mut f = fields(Country::Us, "12345");
        f.phone_number = "  ".to_string();
        let mut errors = FieldErrors::new();
        f.validate(&mut errors);
        assert!(errors.contains("phone_number"));
    }
}
