//! Gaode (AMap) web-service requests and responses.

use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::LazyLock;

pub const OFFSET: u32 = 20;
pub const PAGE: u32 = 1;
pub const EXTENSIONS: &str = "base";
pub const OUTPUT: &str = "JSON";

/// Largest radius, in meters, the around-search endpoint accepts.
pub const MAX_RADIUS: u32 = 50_000;

static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d{1,3}(\.\d{1,6})?,-?\d{1,2}(\.\d{1,6})?$").expect("location pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRequest(pub String);

impl fmt::Display for InvalidRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid request: {}", self.0)
    }
}

impl std::error::Error for InvalidRequest {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortRule {
    #[default]
    Distance,
    Weight,
}

impl SortRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortRule::Distance => "distance",
            SortRule::Weight => "weight",
        }
    }
}

/// Parameters of a nearby-place search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AroundSearchRequest {
    location: String,
    types: String,
    radius: u32,
    sort_rule: SortRule,
}

impl AroundSearchRequest {
    /// `location` is `"lng,lat"`; `types` is a POI keyword or type code.
    pub fn new(
        location: impl Into<String>,
        types: impl Into<String>,
        radius: u32,
        sort_rule: SortRule,
    ) -> Result<Self, InvalidRequest> {
        let location = location.into();
        let types = types.into();
        if !LOCATION.is_match(&location) {
            return Err(InvalidRequest(format!(
                "location '{location}' must look like 116.481488,39.990464"
            )));
        }
        if types.trim().is_empty() {
            return Err(InvalidRequest("types must not be empty".into()));
        }
        if radius == 0 || radius > MAX_RADIUS {
            return Err(InvalidRequest(format!("radius must be between 1 and {MAX_RADIUS} meters")));
        }
        Ok(Self { location, types, radius, sort_rule })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn types(&self) -> &str {
        &self.types
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn sort_rule(&self) -> SortRule {
        self.sort_rule
    }
}

/// Geocode lookup URL.
pub fn address_url(base: &str, key: &str, address: &str, city: &str) -> String {
    format!(
        "{base}?address={}&city={}&output={OUTPUT}&key={}",
        urlencoding::encode(address),
        urlencoding::encode(city),
        urlencoding::encode(key),
    )
}

/// Nearby-search URL.
pub fn around_search_url(base: &str, key: &str, request: &AroundSearchRequest) -> String {
    format!(
        "{base}?location={}&types={}&radius={}&sortrule={}&offset={OFFSET}&page={PAGE}&extensions={EXTENSIONS}&key={}",
        urlencoding::encode(&request.location),
        urlencoding::encode(&request.types),
        request.radius,
        request.sort_rule.as_str(),
        urlencoding::encode(key),
    )
}

/// Gaode encodes an empty string field as `[]`; map anything that is not a
/// string to `""`.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    /// "1" on success, "0" on failure.
    pub status: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub geocodes: Vec<Geocode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geocode {
    #[serde(deserialize_with = "lenient_string", default)]
    pub formatted_address: String,
    #[serde(deserialize_with = "lenient_string", default)]
    pub location: String,
    #[serde(deserialize_with = "lenient_string", default)]
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct AroundSearchResponse {
    pub status: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub pois: Vec<Poi>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Poi {
    #[serde(deserialize_with = "lenient_string", default)]
    pub name: String,
    #[serde(deserialize_with = "lenient_string", default)]
    pub address: String,
    #[serde(deserialize_with = "lenient_string", default)]
    pub distance: String,
    #[serde(rename = "type", deserialize_with = "lenient_string", default)]
    pub kind: String,
}

impl GeocodeResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }
}

impl AroundSearchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }
}
