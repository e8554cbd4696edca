//! Turns a free-text address into a validation result plus the attempts that produced it.

use std::sync::Arc;
use std::time::Instant;

use common::env_config::GeocodingConfig;
use common::misc::Country;
use db::dtos::address::{AddressResult, LogCreateRequest};
use db::models::address::{ValidationSource, ValidationStatus};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::services::geocoding::{GeocodeResult, GeocodingError, GeocodingGateway, GoogleMaps};
use crate::services::parser;

const LOCAL_US_CONFIDENCE: f64 = 0.7;
const FALLBACK_US_CONFIDENCE: f64 = 0.6;
const LOCAL_CA_CONFIDENCE: f64 = 0.5;

/// One call to a validation source, as written to the log table.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationAttempt {
    pub source: ValidationSource,
    pub request_data: Value,
    pub response_data: Value,
    pub success: bool,
    pub error_message: Option<String>,
    pub processing_time: f64,
}

impl ValidationAttempt {
    fn finished(
        source: ValidationSource,
        original: &str,
        started: Instant,
        response_data: Value,
        error_message: Option<String>,
    ) -> Self {
        ValidationAttempt {
            source,
            request_data: json!({ "original_address": original }),
            response_data,
            success: error_message.is_none(),
            error_message,
            processing_time: started.elapsed().as_secs_f64().max(1e-6),
        }
    }

    pub fn into_log(self, address_id: Uuid) -> LogCreateRequest {
        LogCreateRequest {
            address_id,
            validation_source: self.source,
            request_data: self.request_data,
            response_data: self.response_data,
            success: self.success,
            error_message: self.error_message,
            processing_time: self.processing_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub result: AddressResult,
    pub attempts: Vec<ValidationAttempt>,
}

/// Status and confidence for a geocoder `location_type`.
pub fn confidence_for(location_type: &str) -> (ValidationStatus, f64) {
    match location_type {
        "ROOFTOP" => (ValidationStatus::Valid, 0.95),
        "RANGE_INTERPOLATED" => (ValidationStatus::Valid, 0.85),
        _ => (ValidationStatus::Partial, 0.7),
    }
}

fn geocoded_result(found: &GeocodeResult, country: Country) -> AddressResult {
    let (validation_status, confidence) = confidence_for(&found.location_type);
    let mut result = AddressResult {
        normalized_address: Some(found.formatted_address.clone()),
        validation_status,
        validation_source: ValidationSource::Google,
        confidence_score: Some(confidence),
        latitude: Some(found.latitude),
        longitude: Some(found.longitude),
        ..Default::default()
    };

    for component in &found.components {
        let long_name = Some(component.long_name.clone());
        if component.has_type("street_number") {
            result.street_number = long_name;
        } else if component.has_type("route") {
            result.street_name = long_name;
        } else if component.has_type("subpremise") {
            result.unit = long_name;
        } else if component.has_type("locality") {
            result.city = long_name;
        } else if component.has_type("administrative_area_level_1") {
            result.state_province = Some(component.short_name.clone());
        } else if component.has_type("postal_code") {
            result.postal_code = long_name;
        } else if component.has_type("country") {
            result.country = long_name;
        }
    }
    if result.country.is_none() {
        result.country = Some(country.name().to_string());
    }
    result
}

fn not_found_result(country: Country) -> AddressResult {
    AddressResult {
        country: Some(country.name().to_string()),
        validation_status: ValidationStatus::Invalid,
        validation_source: ValidationSource::Google,
        confidence_score: Some(0.0),
        ..Default::default()
    }
}

/// US parses that replace a failed geocoder lookup score lower than plain local parses.
fn local_result(
    parsed: &parser::ParsedAddress,
    country: Country,
    after_geocoder_error: bool,
) -> AddressResult {
    let (validation_source, confidence) = match country {
        Country::Us if after_geocoder_error => {
            (ValidationSource::Usaddress, FALLBACK_US_CONFIDENCE)
        }
        Country::Us => (ValidationSource::Usaddress, LOCAL_US_CONFIDENCE),
        Country::Ca => (ValidationSource::Manual, LOCAL_CA_CONFIDENCE),
    };
    let mut result = AddressResult {
        unit: parsed.unit.clone(),
        street_number: parsed.street_number.clone(),
        street_name: parsed.street_name.clone(),
        street_type: parsed.street_type.clone(),
        city: parsed.city.clone(),
        state_province: parsed.state.clone(),
        postal_code: parsed.postal_code.clone(),
        country: Some(country.name().to_string()),
        validation_status: ValidationStatus::Partial,
        validation_source,
        confidence_score: Some(confidence),
        ..Default::default()
    };
    result.normalized_address = result.components().format();
    result
}

/// Validation pipeline: geocoder first when configured, local parser otherwise
/// or when the geocoder fails.
pub struct AddressValidator {
    geocoder: Option<Arc<dyn GeocodingGateway>>,
}

impl AddressValidator {
    pub fn new(geocoder: Option<Arc<dyn GeocodingGateway>>) -> Self {
        AddressValidator { geocoder }
    }

    pub fn from_config(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let geocoder = GoogleMaps::from_config(config)?
            .map(|maps| Arc::new(maps) as Arc<dyn GeocodingGateway>);
        if geocoder.is_none() {
            log::warn!("GOOGLE_MAPS_API_KEY not set, addresses are validated locally");
        }
        Ok(AddressValidator::new(geocoder))
    }

    pub fn has_geocoder(&self) -> bool {
        self.geocoder.is_some()
    }

    /// Never fails: geocoder problems are recorded as failed attempts and the
    /// local parser takes over.
    pub async fn run(&self, original: &str, country: Country) -> ValidationOutcome {
        let mut attempts = Vec::new();

        if let Some(geocoder) = &self.geocoder {
            let started = Instant::now();
            match geocoder.geocode(original).await {
                Ok(Some(found)) => {
                    let result = geocoded_result(&found, country);
                    attempts.push(ValidationAttempt::finished(
                        ValidationSource::Google,
                        original,
                        started,
                        found.raw,
                        None,
                    ));
                    return ValidationOutcome { result, attempts };
                }
                Ok(None) => {
                    attempts.push(ValidationAttempt::finished(
                        ValidationSource::Google,
                        original,
                        started,
                        json!({ "results": [] }),
                        Some("No geocoding results found".to_string()),
                    ));
                    return ValidationOutcome {
                        result: not_found_result(country),
                        attempts,
                    };
                }
                Err(e) => {
                    log::error!("Geocoding failed for '{original}': {e}");
                    attempts.push(ValidationAttempt::finished(
                        ValidationSource::Google,
                        original,
                        started,
                        json!({}),
                        Some(e.to_string()),
                    ));
                    log::warn!("Falling back to local parsing for '{original}'");
                }
            }
        }

        let after_geocoder_error = !attempts.is_empty();
        let started = Instant::now();
        let parsed = parser::parse(original);
        let result = local_result(&parsed, country, after_geocoder_error);
        let log_source = match country {
            Country::Us => ValidationSource::Usaddress,
            Country::Ca => ValidationSource::CanadaPost,
        };
        attempts.push(ValidationAttempt::finished(
            log_source,
            original,
            started,
            parsed.to_json(),
            None,
        ));
        ValidationOutcome { result, attempts }
    }

    /// Place predictions, empty when no geocoder is configured or it fails.
    pub async fn autocomplete(&self, input: &str, country: &str) -> Vec<Value> {
        let Some(geocoder) = &self.geocoder else {
            return Vec::new();
        };
        if input.trim().is_empty() {
            return Vec::new();
        }
        match geocoder.autocomplete(input.trim(), country).await {
            Ok(predictions) => predictions,
            Err(e) => {
                log::error!("Autocomplete failed for '{input}': {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geocoding::AddressComponent;
    use crate::services::geocoding::canned::Canned;

    fn component(long_name: &str, short_name: &str, kind: &str) -> AddressComponent {
        AddressComponent {
            long_name: long_name.to_string(),
            short_name: short_name.to_string(),
            types: vec![kind.to_string()],
        }
    }

    fn found(location_type: &str) -> GeocodeResult {
        GeocodeResult {
            formatted_address: "123 Main St, Springfield, IL 62701, USA".to_string(),
            latitude: 39.78,
            longitude: -89.65,
            location_type: location_type.to_string(),
            components: vec![
                component("123", "123", "street_number"),
                component("Main Street", "Main St", "route"),
                component("Springfield", "Springfield", "locality"),
                component("Illinois", "IL", "administrative_area_level_1"),
                component("62701", "62701", "postal_code"),
                component("United States", "US", "country"),
            ],
            raw: json!({ "formatted_address": "123 Main St, Springfield, IL 62701, USA" }),
        }
    }

    fn validator(geocode: Result<Option<GeocodeResult>, String>) -> AddressValidator {
        AddressValidator::new(Some(Arc::new(Canned::geocoding(geocode))))
    }

    #[test]
    fn confidence_table() {
        assert_eq!(confidence_for("ROOFTOP"), (ValidationStatus::Valid, 0.95));
        assert_eq!(confidence_for("RANGE_INTERPOLATED"), (ValidationStatus::Valid, 0.85));
        assert_eq!(confidence_for("GEOMETRIC_CENTER"), (ValidationStatus::Partial, 0.7));
        assert_eq!(confidence_for("APPROXIMATE"), (ValidationStatus::Partial, 0.7));
    }

    #[actix_web::test]
    async fn rooftop_match_is_valid() {
        let outcome = validator(Ok(Some(found("ROOFTOP"))))
            .run("123 Main St, Springfield, IL", Country::Us)
            .await;
        let result = &outcome.result;
        assert_eq!(result.validation_status, ValidationStatus::Valid);
        assert_eq!(result.validation_source, ValidationSource::Google);
        assert_eq!(result.confidence_score, Some(0.95));
        assert_eq!(result.street_name.as_deref(), Some("Main Street"));
        assert_eq!(result.state_province.as_deref(), Some("IL"));
        assert_eq!(result.latitude, Some(39.78));
        assert_eq!(outcome.attempts.len(), 1);
        assert!(outcome.attempts[0].success);
        assert!(outcome.attempts[0].processing_time > 0.0);
    }

    #[actix_web::test]
    async fn no_results_is_invalid() {
        let outcome = validator(Ok(None)).run("nowhere", Country::Ca).await;
        assert_eq!(outcome.result.validation_status, ValidationStatus::Invalid);
        assert_eq!(outcome.result.confidence_score, Some(0.0));
        assert_eq!(outcome.result.country.as_deref(), Some("Canada"));
        let attempt = &outcome.attempts[0];
        assert!(!attempt.success);
        assert_eq!(attempt.error_message.as_deref(), Some("No geocoding results found"));
        assert_eq!(attempt.response_data, json!({ "results": [] }));
    }

    #[actix_web::test]
    async fn geocoder_error_falls_back_to_local_parse() {
        let outcome = validator(Err("timeout".to_string()))
            .run("123 Main St, Springfield, IL 62701", Country::Us)
            .await;
        assert_eq!(outcome.result.validation_status, ValidationStatus::Partial);
        assert_eq!(outcome.result.validation_source, ValidationSource::Usaddress);
        assert_eq!(outcome.result.confidence_score, Some(0.6));

        let sources: Vec<_> = outcome.attempts.iter().map(|a| (a.source, a.success)).collect();
        assert_eq!(
            sources,
            vec![(ValidationSource::Google, false), (ValidationSource::Usaddress, true)]
        );
    }

    #[actix_web::test]
    async fn local_us_parse_without_geocoder() {
        let outcome = AddressValidator::new(None)
            .run("123 Main St, Springfield, IL 62701", Country::Us)
            .await;
        assert_eq!(outcome.result.validation_source, ValidationSource::Usaddress);
        assert_eq!(outcome.result.confidence_score, Some(0.7));
        assert_eq!(
            outcome.result.normalized_address.as_deref(),
            Some("123 Main St, Springfield, IL, 62701, United States")
        );
        assert_eq!(outcome.attempts.len(), 1);
        assert_eq!(outcome.attempts[0].response_data["address_type"], "Street Address");
    }

    #[actix_web::test]
    async fn local_canadian_parse_is_manual() {
        let outcome = AddressValidator::new(None)
            .run("24 Sussex Drive, Ottawa, ON K1M 1M4", Country::Ca)
            .await;
        assert_eq!(outcome.result.validation_source, ValidationSource::Manual);
        assert_eq!(outcome.result.confidence_score, Some(0.5));
        assert_eq!(outcome.result.country.as_deref(), Some("Canada"));
        assert_eq!(outcome.attempts[0].source, ValidationSource::CanadaPost);
    }

    #[actix_web::test]
    async fn canadian_geocoder_error_falls_back_to_manual_parse() {
        let outcome = validator(Err("timeout".to_string()))
            .run("24 Sussex Drive, Ottawa, ON K1M 1M4", Country::Ca)
            .await;
        assert_eq!(outcome.result.validation_status, ValidationStatus::Partial);
        assert_eq!(outcome.result.validation_source, ValidationSource::Manual);
        assert_eq!(outcome.result.confidence_score, Some(0.5));
        assert_eq!(outcome.result.postal_code.as_deref(), Some("K1M 1M4"));

        let sources: Vec<_> = outcome.attempts.iter().map(|a| (a.source, a.success)).collect();
        assert_eq!(
            sources,
            vec![(ValidationSource::Google, false), (ValidationSource::CanadaPost, true)]
        );
        assert_eq!(
            outcome.attempts[0].error_message.as_deref(),
            Some("unexpected geocoding response: timeout")
        );
        assert!(outcome.attempts.iter().all(|a| a.processing_time > 0.0));
    }

    #[actix_web::test]
    async fn autocomplete_is_empty_without_a_working_geocoder() {
        assert!(AddressValidator::new(None).autocomplete("123 Ma", "us").await.is_empty());
        assert_eq!(validator(Ok(None)).autocomplete("123 Ma", "us").await.len(), 1);
        assert!(validator(Ok(None)).autocomplete("   ", "us").await.is_empty());

        let broken = AddressValidator::new(Some(Arc::new(Canned {
            geocode: Ok(None),
            predictions: Err("denied".to_string()),
        })));
        assert!(broken.autocomplete("123 Ma", "us").await.is_empty());
    }

    #[test]
    fn attempts_become_log_rows() {
        let attempt = ValidationAttempt {
            source: ValidationSource::Google,
            request_data: json!({ "original_address": "x" }),
            response_data: json!({}),
            success: false,
            error_message: Some("boom".to_string()),
            processing_time: 0.5,
        };
        let address_id = Uuid::new_v4();
        let log = attempt.into_log(address_id);
        assert_eq!(log.address_id, address_id);
        assert_eq!(log.error_message.as_deref(), Some("boom"));
    }
}
