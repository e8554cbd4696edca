//! Rule-based address tagger used when no geocoder is available or it fails.
//!
//! Recognises `<number> <name...> <type>` street lines, unit designators
//! (`Apt`, `Unit`, `Suite`, `#`), a trailing `<STATE> <ZIP>` or
//! `<PROV> <POSTAL>` pair and the city preceding it. Labels follow the
//! `usaddress` tag names so logs stay comparable with geocoder output.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};

static REGION_POSTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<rest>.*?)\s*\b(?P<region>[A-Z]{2})\s+(?P<postal>\d{5}(?:-\d{4})?|[A-Z]\d[A-Z]\s?\d[A-Z]\d)$",
    )
    .expect("valid regex")
});
static REGION_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("valid regex"));
static POSTAL_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\d{5}(?:-\d{4})?|[A-Z]\d[A-Z]\s?\d[A-Z]\d)$").expect("valid regex")
});
static UNIT_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<kind>apt\.?|apartment|unit|suite|ste\.?|#)\s*(?P<id>[\w-]+)$")
        .expect("valid regex")
});
static UNIT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<street>.*?)\s+(?P<kind>apt\.?|apartment|unit|suite|ste\.?|#)\s*(?P<id>\d[\w-]*|[A-Z])$",
    )
    .expect("valid regex")
});
static STREET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<number>\d+[A-Za-z]?(?:-\d+)?)\s+(?P<rest>.+)$").expect("valid regex")
});

const STREET_TYPES: &[&str] = &[
    "st", "street", "ave", "avenue", "rd", "road", "blvd", "boulevard", "dr", "drive", "ln",
    "lane", "way", "ct", "court", "pl", "place", "ter", "terrace", "cir", "circle", "pkwy",
    "parkway", "hwy", "highway", "sq", "square", "trl", "trail", "cres", "crescent",
];

const COUNTRY_NAMES: &[&str] = &[
    "us",
    "usa",
    "united states",
    "united states of america",
    "ca",
    "canada",
];

fn is_street_type(word: &str) -> bool {
    let word = word.trim_end_matches('.').to_lowercase();
    STREET_TYPES.contains(&word.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressType {
    StreetAddress,
    #[default]
    Ambiguous,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::StreetAddress => "Street Address",
            AddressType::Ambiguous => "Ambiguous",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAddress {
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub street_type: Option<String>,
    pub unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub address_type: AddressType,
    /// Every recognised piece with its tag, in input order of discovery.
    pub tagged: Vec<(&'static str, String)>,
}

struct StreetLine {
    number: String,
    name: String,
    kind: Option<String>,
    trailing: Option<String>,
}

/// Splits `123 Main St Springfield` into number, name, type and whatever follows the type.
fn parse_street_line(line: &str) -> Option<StreetLine> {
    let caps = STREET_LINE.captures(line)?;
    let words: Vec<&str> = caps["rest"].split_whitespace().collect();
    let type_at = words
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, word)| is_street_type(word))
        .map(|(i, _)| i);

    let (name, kind, trailing) = match type_at {
        Some(i) => (
            words[..i].join(" "),
            Some(words[i].trim_end_matches('.').to_string()),
            (i + 1 < words.len()).then(|| words[i + 1..].join(" ")),
        ),
        None => (words.join(" "), None, None),
    };

    Some(StreetLine {
        number: caps["number"].to_string(),
        name,
        kind,
        trailing,
    })
}

impl ParsedAddress {
    fn tag(&mut self, label: &'static str, value: &str) {
        self.tagged.push((label, value.to_string()));
    }

    fn set_unit(&mut self, kind: &str, id: &str) {
        self.tag("OccupancyType", kind);
        self.tag("OccupancyIdentifier", id);
        self.unit = Some(id.to_string());
    }

    fn take_region(&mut self, segments: &mut Vec<String>) {
        let Some(last) = segments.last().cloned() else {
            return;
        };

        if let Some(caps) = REGION_POSTAL.captures(&last) {
            let region = caps["region"].to_uppercase();
            let postal = caps["postal"].to_uppercase();
            let rest = caps["rest"].trim().to_string();
            segments.pop();
            if !rest.is_empty() {
                segments.push(rest);
            }
            self.tag("StateName", &region);
            self.tag("ZipCode", &postal);
            self.state = Some(region);
            self.postal_code = Some(postal);
        } else if segments.len() > 1 && REGION_ONLY.is_match(&last) {
            segments.pop();
            let region = last.to_uppercase();
            self.tag("StateName", &region);
            self.state = Some(region);
        } else if segments.len() > 1 && POSTAL_ONLY.is_match(&last) {
            segments.pop();
            let postal = last.to_uppercase();
            self.tag("ZipCode", &postal);
            self.postal_code = Some(postal);
            self.take_region(segments);
        }
    }

    fn take_street(&mut self, segment: &str) -> bool {
        let (line, unit) = match UNIT_SUFFIX.captures(segment) {
            Some(caps) => (
                caps["street"].to_string(),
                Some((caps["kind"].to_string(), caps["id"].to_string())),
            ),
            None => (segment.to_string(), None),
        };
        let Some(street) = parse_street_line(&line) else {
            return false;
        };

        self.tag("AddressNumber", &street.number);
        self.tag("StreetName", &street.name);
        self.street_number = Some(street.number);
        self.street_name = Some(street.name);

        match (street.kind, street.trailing) {
            (Some(kind), Some(trailing)) if self.city.is_none() => {
                self.tag("StreetNamePostType", &kind);
                self.tag("PlaceName", &trailing);
                self.street_type = Some(kind);
                self.city = Some(trailing);
            }
            (Some(kind), Some(trailing)) => {
                let kind = format!("{kind} {trailing}");
                self.tag("StreetNamePostType", &kind);
                self.street_type = Some(kind);
            }
            (Some(kind), None) => {
                self.tag("StreetNamePostType", &kind);
                self.street_type = Some(kind);
            }
            (None, _) => {}
        }

        if let Some((kind, id)) = unit {
            self.set_unit(&kind, &id);
        }
        true
    }

    /// Flat JSON with the same keys for every parse; missing parts are empty strings.
    pub fn to_json(&self) -> Value {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let parsed_components: Vec<Value> = self
            .tagged
            .iter()
            .map(|(label, value)| json!([label, value]))
            .collect();

        json!({
            "street_number": text(&self.street_number),
            "street_name": text(&self.street_name),
            "street_type": text(&self.street_type),
            "unit": text(&self.unit),
            "city": text(&self.city),
            "state": text(&self.state),
            "postal_code": text(&self.postal_code),
            "address_type": self.address_type.as_str(),
            "parsed_components": parsed_components,
        })
    }
}

/// Tags a free-form address. Never fails: unrecognised input yields an
/// `Ambiguous` result with whatever pieces could be identified.
pub fn parse(text: &str) -> ParsedAddress {
    let mut parsed = ParsedAddress::default();
    let mut segments: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(last) = segments.last() {
        if segments.len() > 1 && COUNTRY_NAMES.contains(&last.to_lowercase().as_str()) {
            parsed.tag("CountryName", last);
            segments.pop();
        }
    }

    parsed.take_region(&mut segments);

    if segments.len() > 1 {
        if let Some(city) = segments.pop() {
            parsed.tag("PlaceName", &city);
            parsed.city = Some(city);
        }
    }

    for segment in &segments {
        if let Some(caps) = UNIT_SEGMENT.captures(segment) {
            parsed.set_unit(&caps["kind"], &caps["id"]);
        } else if parsed.street_number.is_some() || !parsed.take_street(segment) {
            parsed.tag("Unparsed", segment);
        }
    }

    if parsed.street_number.is_some() && parsed.street_name.is_some() {
        parsed.address_type = AddressType::StreetAddress;
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_street_address() {
        let parsed = parse("123 Main St, Springfield, IL 62701");
        assert_eq!(parsed.street_number.as_deref(), Some("123"));
        assert_eq!(parsed.street_name.as_deref(), Some("Main"));
        assert_eq!(parsed.street_type.as_deref(), Some("St"));
        assert_eq!(parsed.city.as_deref(), Some("Springfield"));
        assert_eq!(parsed.state.as_deref(), Some("IL"));
        assert_eq!(parsed.postal_code.as_deref(), Some("62701"));
        assert_eq!(parsed.address_type, AddressType::StreetAddress);
    }

    #[test]
    fn unit_suffix_zip_plus_four_and_country() {
        let parsed = parse("456 Oak Avenue Apt 4B, Chicago, IL 60601-1234, USA");
        assert_eq!(parsed.unit.as_deref(), Some("4B"));
        assert_eq!(parsed.street_name.as_deref(), Some("Oak"));
        assert_eq!(parsed.street_type.as_deref(), Some("Avenue"));
        assert_eq!(parsed.postal_code.as_deref(), Some("60601-1234"));
        assert!(parsed.tagged.contains(&("CountryName", "USA".to_string())));
    }

    #[test]
    fn canadian_address_with_unit_segment() {
        let parsed = parse("Unit 5, 77 King Street, Toronto, ON");
        assert_eq!(parsed.unit.as_deref(), Some("5"));
        assert_eq!(parsed.street_number.as_deref(), Some("77"));
        assert_eq!(parsed.street_type.as_deref(), Some("Street"));
        assert_eq!(parsed.city.as_deref(), Some("Toronto"));
        assert_eq!(parsed.state.as_deref(), Some("ON"));
        assert_eq!(parsed.postal_code, None);
    }

    #[test]
    fn canadian_postal_code_is_upper_cased() {
        let parsed = parse("24 Sussex Drive, Ottawa, on k1m 1m4");
        assert_eq!(parsed.state.as_deref(), Some("ON"));
        assert_eq!(parsed.postal_code.as_deref(), Some("K1M 1M4"));
        assert_eq!(parsed.city.as_deref(), Some("Ottawa"));
    }

    #[test]
    fn city_after_street_type_without_commas() {
        let parsed = parse("123 Main St Springfield IL 62701");
        assert_eq!(parsed.street_name.as_deref(), Some("Main"));
        assert_eq!(parsed.city.as_deref(), Some("Springfield"));
        assert_eq!(parsed.state.as_deref(), Some("IL"));
    }

    #[test]
    fn street_name_may_start_with_a_type_word() {
        let parsed = parse("9 St Clair Ave, Toronto");
        assert_eq!(parsed.street_name.as_deref(), Some("St Clair"));
        assert_eq!(parsed.street_type.as_deref(), Some("Ave"));
    }

    #[test]
    fn free_text_is_ambiguous() {
        let parsed = parse("somewhere over the rainbow");
        assert_eq!(parsed.address_type, AddressType::Ambiguous);
        assert_eq!(parsed.street_number, None);
        assert_eq!(parsed.tagged, vec![("Unparsed", "somewhere over the rainbow".to_string())]);
    }

    #[test]
    fn json_has_every_key() {
        let value = parse("123 Main St, Springfield, IL 62701").to_json();
        assert_eq!(value["street_number"], "123");
        assert_eq!(value["unit"], "");
        assert_eq!(value["address_type"], "Street Address");
        let components = value["parsed_components"].as_array().unwrap();
        assert!(components.contains(&json!(["PlaceName", "Springfield"])));
    }

    #[test]
    fn repeated_labels_are_all_kept() {
        let parsed = parse("123 Main St, Building C, Rear entrance, Springfield, IL 62701");
        assert_eq!(parsed.city.as_deref(), Some("Springfield"));
        let components = parsed.to_json()["parsed_components"].clone();
        let unparsed: Vec<&Value> = components
            .as_array()
            .unwrap()
            .iter()
            .filter(|pair| pair[0] == "Unparsed")
            .map(|pair| &pair[1])
            .collect();
        assert_eq!(unparsed, vec![&json!("Building C"), &json!("Rear entrance")]);
    }
}
