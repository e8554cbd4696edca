use std::str::FromStr;

use chrono::NaiveDateTime;
use common::misc::UnknownVariant;
use serde::{Deserialize, Serialize};
use sqlx::types::JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Pending,
    Valid,
    Invalid,
    Partial,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Valid => "valid",
            ValidationStatus::Invalid => "invalid",
            ValidationStatus::Partial => "partial",
        }
    }
}

impl FromStr for ValidationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ValidationStatus::Pending),
            "valid" => Ok(ValidationStatus::Valid),
            "invalid" => Ok(ValidationStatus::Invalid),
            "partial" => Ok(ValidationStatus::Partial),
            _ => Err(UnknownVariant {
                kind: "validation status",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ValidationStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Where a validation result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationSource {
    Google,
    CanadaPost,
    #[default]
    Manual,
    Usaddress,
}

impl ValidationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationSource::Google => "google",
            ValidationSource::CanadaPost => "canada_post",
            ValidationSource::Manual => "manual",
            ValidationSource::Usaddress => "usaddress",
        }
    }
}

impl FromStr for ValidationSource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(ValidationSource::Google),
            "canada_post" => Ok(ValidationSource::CanadaPost),
            "manual" => Ok(ValidationSource::Manual),
            "usaddress" => Ok(ValidationSource::Usaddress),
            _ => Err(UnknownVariant {
                kind: "validation source",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ValidationSource {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ValidatedAddress {
    pub id: Uuid,
    pub original_address: String,
    pub unit: Option<String>,
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub street_type: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub normalized_address: Option<String>,
    #[sqlx(try_from = "String")]
    pub validation_status: ValidationStatus,
    #[sqlx(try_from = "String")]
    pub validation_source: ValidationSource,
    pub confidence_score: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub validated_by: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Address components in display order.
pub struct Components<'a> {
    pub unit: &'a Option<String>,
    pub street_number: &'a Option<String>,
    pub street_name: &'a Option<String>,
    pub street_type: &'a Option<String>,
    pub city: &'a Option<String>,
    pub state_province: &'a Option<String>,
    pub postal_code: &'a Option<String>,
    pub country: &'a Option<String>,
}

impl Components<'_> {
    /// Joins the set components as `Unit 5, 123 Main St, City, ST, 12345, Country`.
    /// The street is only emitted when both number and name are known.
    /// `None` when nothing is set.
    pub fn format(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(unit) = present(self.unit) {
            parts.push(format!("Unit {unit}"));
        }
        if let (Some(number), Some(name)) = (present(self.street_number), present(self.street_name)) {
            let mut street = format!("{number} {name}");
            if let Some(kind) = present(self.street_type) {
                street.push(' ');
                street.push_str(kind);
            }
            parts.push(street);
        }
        parts.extend(
            [self.city, self.state_province, self.postal_code, self.country]
                .into_iter()
                .filter_map(present)
                .map(str::to_string),
        );

        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

impl ValidatedAddress {
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

    /// Formatted components, or the original text when no component is set.
    pub fn formatted_address(&self) -> String {
        self.components()
            .format()
            .unwrap_or_else(|| self.original_address.clone())
    }

    pub fn is_valid(&self) -> bool {
        self.validation_status == ValidationStatus::Valid
    }
}

/// One validation attempt. Rows are only ever inserted.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AddressValidationLog {
    pub id: Uuid,
    pub address_id: Uuid,
    #[sqlx(try_from = "String")]
    pub validation_source: ValidationSource,
    pub request_data: JsonValue,
    pub response_data: JsonValue,
    pub success: bool,
    pub error_message: Option<String>,
    pub processing_time: f64,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(original: &str) -> ValidatedAddress {
        let now = chrono::Utc::now().naive_utc();
        ValidatedAddress {
            id: Uuid::new_v4(),
            original_address: original.to_string(),
            unit: None,
            street_number: None,
            street_name: None,
            street_type: None,
            city: None,
            state_province: None,
            postal_code: None,
            country: None,
            normalized_address: None,
            validation_status: ValidationStatus::Pending,
            validation_source: ValidationSource::Manual,
            confidence_score: None,
            latitude: None,
            longitude: None,
            validated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn formatted_address_from_components() {
        let mut a = address("raw");
        a.unit = Some("5".to_string());
        a.street_number = Some("123".to_string());
        a.street_name = Some("Main".to_string());
        a.street_type = Some("St".to_string());
        a.city = Some("Springfield".to_string());
        a.state_province = Some("IL".to_string());
        a.postal_code = Some("62701".to_string());
        a.country = Some("United States".to_string());
        assert_eq!(
            a.formatted_address(),
            "Unit 5, 123 Main St, Springfield, IL, 62701, United States"
        );
    }

    #[test]
    fn street_needs_number_and_name() {
        let mut a = address("raw");
        a.street_name = Some("Main".to_string());
        a.city = Some("Springfield".to_string());
        assert_eq!(a.formatted_address(), "Springfield");
    }

    #[test]
    fn empty_components_fall_back_to_original() {
        let mut a = address("somewhere over the rainbow");
        a.city = Some(String::new());
        assert_eq!(a.formatted_address(), "somewhere over the rainbow");
        assert!(!a.is_valid());
        a.validation_status = ValidationStatus::Valid;
        assert!(a.is_valid());
    }

    #[test]
    fn source_names_match_storage() {
        assert_eq!(ValidationSource::CanadaPost.as_str(), "canada_post");
        assert_eq!(
            serde_json::to_string(&ValidationSource::CanadaPost).unwrap(),
            "\"canada_post\""
        );
        assert_eq!("usaddress".parse::<ValidationSource>().unwrap(), ValidationSource::Usaddress);
        assert_eq!(serde_json::to_string(&ValidationStatus::Partial).unwrap(), "\"partial\"");
    }
}
