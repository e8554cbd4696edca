use common::error::{AppError, Res};
use common::misc::{Country, non_blank};
use db::dtos::address::StatusCounts;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /address-validation/validate`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValidateRequest {
    pub address: Option<String>,
    pub country_hint: Option<String>,
}

impl ValidateRequest {
    /// Trimmed address text, 400 when blank.
    pub fn address(&self) -> Res<String> {
        non_blank(self.address.as_deref())
            .map(str::to_string)
            .ok_or_else(|| AppError::field("address", "Address is required"))
    }

    /// `CA` selects the Canadian path, anything else the US one.
    pub fn country(&self) -> Country {
        Country::from_hint(self.country_hint.as_deref().unwrap_or("US"))
    }
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub input: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "us".to_string()
}

/// `?address_id=` filter for `GET /address-validation/validation-logs`.
#[derive(Debug, Default, Deserialize)]
pub struct LogFilter {
    pub address_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub predictions: Vec<serde_json::Value>,
}

/// Counts per status plus the derived rates, in percent with one decimal.
#[derive(Debug, Serialize, PartialEq)]
pub struct ValidationStatistics {
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub valid_percentage: f64,
    pub success_rate: f64,
}

fn percent(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

impl From<StatusCounts> for ValidationStatistics {
    fn from(counts: StatusCounts) -> Self {
        ValidationStatistics {
            valid_percentage: percent(counts.valid, counts.total),
            success_rate: percent(counts.valid + counts.partial, counts.total),
            counts,
        }
    }
}
