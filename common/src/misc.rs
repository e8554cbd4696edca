use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static CANADIAN_POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\d[A-Z]\s?\d[A-Z]\d$").expect("valid regex"));
static US_ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid regex"));

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Countries served. Stored as ISO 3166-1 alpha-2 codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Country {
    #[default]
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "CA")]
    Ca,
}

impl Country {
    pub fn code(&self) -> &'static str {
        match self {
            Country::Us => "US",
            Country::Ca => "CA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Country::Us => "United States",
            Country::Ca => "Canada",
        }
    }

    /// Interprets a free-form country hint. Anything that isn't Canada is treated as US.
    pub fn from_hint(hint: &str) -> Self {
        if hint.trim().eq_ignore_ascii_case("CA") {
            Country::Ca
        } else {
            Country::Us
        }
    }

    /// Checks `postal_code` against this country's format and returns it normalized
    /// (trimmed, upper-cased). The error message is suitable for a field error.
    pub fn validate_postal_code(&self, postal_code: &str) -> Result<String, String> {
        let normalized = postal_code.trim().to_uppercase();
        match self {
            Country::Ca if !CANADIAN_POSTAL_CODE.is_match(&normalized) => Err(
                "Canadian postal codes must be in the format A1A 1A1 (e.g., K1A 0A6)".to_string(),
            ),
            Country::Us if !US_ZIP_CODE.is_match(&normalized) => {
                Err("US ZIP codes must be in the format 12345 or 12345-1234".to_string())
            }
            _ => Ok(normalized),
        }
    }
}

impl FromStr for Country {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "US" => Ok(Country::Us),
            "CA" => Ok(Country::Ca),
            _ => Err(UnknownVariant {
                kind: "country",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Country {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Treats blank strings as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
