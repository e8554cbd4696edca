//! Google Geocoding and Places Autocomplete client behind a swappable gateway.

use std::time::Duration;

use common::env_config::GeocodingConfig;
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding API returned status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: String,
        message: Option<String>,
    },

    #[error("unexpected geocoding response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

/// Best match for a geocoded address. `raw` keeps the provider's JSON for the audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_type: String,
    pub components: Vec<AddressComponent>,
    pub raw: Value,
}

/// External address lookup used by validation and autocomplete.
pub trait GeocodingGateway: Send + Sync {
    /// `Ok(None)` when the provider knows no match for `address`.
    fn geocode<'a>(
        &'a self,
        address: &'a str,
    ) -> BoxFuture<'a, Result<Option<GeocodeResult>, GeocodingError>>;

    /// Place predictions for a partially typed address, restricted to `country`.
    fn autocomplete<'a>(
        &'a self,
        input: &'a str,
        country: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Value>, GeocodingError>>;
}

#[derive(Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    predictions: Vec<Value>,
}

impl Envelope {
    fn parse(body: Value) -> Result<Self, GeocodingError> {
        serde_json::from_value(body).map_err(|e| GeocodingError::Malformed(e.to_string()))
    }

    /// `Ok(false)` for `ZERO_RESULTS`, an error for any status other than `OK`.
    fn has_results(&self) -> Result<bool, GeocodingError> {
        match self.status.as_str() {
            "OK" => Ok(true),
            "ZERO_RESULTS" => Ok(false),
            _ => Err(GeocodingError::Status {
                status: self.status.clone(),
                message: self.error_message.clone(),
            }),
        }
    }
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
    #[serde(default)]
    location_type: Option<String>,
}

#[derive(Deserialize)]
struct GoogleResult {
    formatted_address: String,
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

/// Reads a Geocoding API body and returns its first result.
pub fn parse_geocode_response(body: Value) -> Result<Option<GeocodeResult>, GeocodingError> {
    let envelope = Envelope::parse(body)?;
    if !envelope.has_results()? {
        return Ok(None);
    }
    let Some(raw) = envelope.results.into_iter().next() else {
        return Ok(None);
    };

    let result: GoogleResult = serde_json::from_value(raw.clone())
        .map_err(|e| GeocodingError::Malformed(e.to_string()))?;
    Ok(Some(GeocodeResult {
        formatted_address: result.formatted_address,
        latitude: result.geometry.location.lat,
        longitude: result.geometry.location.lng,
        location_type: result
            .geometry
            .location_type
            .unwrap_or_else(|| "APPROXIMATE".to_string()),
        components: result.address_components,
        raw,
    }))
}

/// Reads a Places Autocomplete body and returns its predictions.
pub fn parse_autocomplete_response(body: Value) -> Result<Vec<Value>, GeocodingError> {
    let envelope = Envelope::parse(body)?;
    if !envelope.has_results()? {
        return Ok(Vec::new());
    }
    Ok(envelope.predictions)
}

/// Google Maps web service client.
pub struct GoogleMaps {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleMaps {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, GeocodingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(GoogleMaps {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &GeocodingConfig) -> Result<Option<Self>, GeocodingError> {
        config
            .api_key
            .as_deref()
            .map(|key| {
                GoogleMaps::new(
                    key,
                    &config.base_url,
                    Duration::from_secs(config.timeout_secs),
                )
            })
            .transpose()
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, GeocodingError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(redacted)?;
        response.json::<Value>().await.map_err(redacted)
    }
}

/// Request URLs carry the API key; errors must not.
fn redacted(error: reqwest::Error) -> GeocodingError {
    GeocodingError::Http(error.without_url())
}

impl GeocodingGateway for GoogleMaps {
    fn geocode<'a>(
        &'a self,
        address: &'a str,
    ) -> BoxFuture<'a, Result<Option<GeocodeResult>, GeocodingError>> {
        Box::pin(async move {
            let body = self.get_json("geocode/json", &[("address", address)]).await?;
            parse_geocode_response(body)
        })
    }

    fn autocomplete<'a>(
        &'a self,
        input: &'a str,
        country: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Value>, GeocodingError>> {
        Box::pin(async move {
            let components = format!("country:{}", country.to_lowercase());
            let body = self
                .get_json(
                    "place/autocomplete/json",
                    &[
                        ("input", input),
                        ("components", components.as_str()),
                        ("types", "address"),
                    ],
                )
                .await?;
            parse_autocomplete_response(body)
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rooftop_body() -> Value {
        json!({
            "status": "OK",
            "results": [{
                "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
                "geometry": {
                    "location": { "lat": 37.4224764, "lng": -122.0842499 },
                    "location_type": "ROOFTOP"
                },
                "address_components": [
                    { "long_name": "1600", "short_name": "1600", "types": ["street_number"] },
                    { "long_name": "Amphitheatre Parkway", "short_name": "Amphitheatre Pkwy", "types": ["route"] },
                    { "long_name": "California", "short_name": "CA", "types": ["administrative_area_level_1", "political"] }
                ]
            }]
        })
    }

    #[test]
    fn first_result_is_extracted() {
        let result = parse_geocode_response(rooftop_body()).unwrap().unwrap();
        assert_eq!(result.location_type, "ROOFTOP");
        assert_eq!(result.latitude, 37.4224764);
        assert_eq!(result.components.len(), 3);
        assert!(result.components[2].has_type("administrative_area_level_1"));
        assert_eq!(result.raw["formatted_address"], result.formatted_address);
    }

    #[test]
    fn zero_results_is_none() {
        let body = json!({ "status": "ZERO_RESULTS", "results": [] });
        assert_eq!(parse_geocode_response(body).unwrap(), None);
    }

    #[test]
    fn missing_location_type_is_approximate() {
        let body = json!({
            "status": "OK",
            "results": [{
                "formatted_address": "Springfield, IL, USA",
                "geometry": { "location": { "lat": 39.78, "lng": -89.65 } }
            }]
        });
        let result = parse_geocode_response(body).unwrap().unwrap();
        assert_eq!(result.location_type, "APPROXIMATE");
        assert!(result.components.is_empty());
    }

    #[test]
    fn error_statuses_are_errors() {
        let body = json!({ "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid." });
        let err = parse_geocode_response(body).unwrap_err();
        assert!(matches!(err, GeocodingError::Status { ref status, .. } if status == "REQUEST_DENIED"));
        assert!(err.to_string().contains("API key is invalid"));

        assert!(matches!(
            parse_geocode_response(json!({ "results": [] })),
            Err(GeocodingError::Malformed(_))
        ));
    }

    #[test]
    fn predictions_are_returned() {
        let body = json!({
            "status": "OK",
            "predictions": [{ "description": "123 Main St, Springfield, IL, USA" }]
        });
        let predictions = parse_autocomplete_response(body).unwrap();
        assert_eq!(predictions.len(), 1);

        let empty = parse_autocomplete_response(json!({ "status": "ZERO_RESULTS" })).unwrap();
        assert!(empty.is_empty());
    }

    #[actix_web::test]
    async fn transport_errors_do_not_carry_the_key() {
        let maps = GoogleMaps::new("SECRET-KEY-123", "http://127.0.0.1:1", Duration::from_secs(2))
            .unwrap();
        let err = maps.geocode("1 Main St").await.unwrap_err();
        assert!(matches!(err, GeocodingError::Http(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"), "{err}");

        let err = maps.autocomplete("1 Main", "us").await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"), "{err}");
    }

    #[test]
    fn no_api_key_means_no_client() {
        let config = GeocodingConfig {
            api_key: None,
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            timeout_secs: 5,
        };
        assert!(GoogleMaps::from_config(&config).unwrap().is_none());
    }
}
