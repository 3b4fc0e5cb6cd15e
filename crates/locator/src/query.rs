//! Turns raw query-string parameters into a validated [`SearchQuery`].

use serde::Deserialize;
use utility::geo;

use crate::{RequestError, RequestResult};

/// Search parameters exactly as they arrive in a URL query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    #[serde(rename = "radiusKm", alias = "radius_km")]
    pub radius_km: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
}

/// Defaults, bounds and leniency of the normalizer, kept in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPolicy {
    pub default_radius_km: f64,
    pub max_radius_km: f64,
    pub default_limit: usize,
    pub max_limit: usize,
    /// Reject unusable `limit` values instead of falling back to the default.
    pub strict_limit: bool,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            default_radius_km: 5.0,
            max_radius_km: 50.0,
            default_limit: 50,
            max_limit: 500,
            strict_limit: false,
        }
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    category: Option<String>,
    limit: usize,
}

impl SearchQuery {
    pub fn new(
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        category: Option<&str>,
        limit: usize,
        policy: &SearchPolicy,
    ) -> RequestResult<Self> {
        if !geo::is_valid_coordinate(latitude, longitude) {
            return Err(RequestError::MissingOrInvalidLocation);
        }
        if !(radius_km > 0.0 && radius_km <= policy.max_radius_km) {
            return Err(RequestError::RadiusOutOfRange {
                max_km: policy.max_radius_km,
            });
        }
        if limit == 0 {
            return Err(RequestError::InvalidLimit);
        }
        let category = category
            .map(|category| category.trim().to_lowercase())
            .filter(|category| !category.is_empty());

        Ok(Self {
            latitude,
            longitude,
            radius_km,
            category,
            limit: limit.min(policy.max_limit),
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Lower-cased, never empty.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

enum Raw<T> {
    Absent,
    Invalid,
    Value(T),
}

fn parse_number(raw: Option<&str>) -> Raw<f64> {
    match raw.map(str::trim) {
        None | Some("") => Raw::Absent,
        Some(text) => match text.parse::<f64>() {
            Ok(number) if number.is_finite() => Raw::Value(number),
            _ => Raw::Invalid,
        },
    }
}

fn parse_count(raw: Option<&str>) -> Raw<usize> {
    match parse_number(raw) {
        Raw::Value(number) if number >= 1.0 && number.fract() == 0.0 => {
            Raw::Value(number.min(usize::MAX as f64) as usize)
        }
        Raw::Absent => Raw::Absent,
        _ => Raw::Invalid,
    }
}

impl SearchParams {
    /// Validates the parameters. Location is checked first, then radius,
    /// then limit; the first problem found is reported.
    pub fn normalize(&self, policy: &SearchPolicy) -> RequestResult<SearchQuery> {
        let (latitude, longitude) = match (
            parse_number(self.lat.as_deref()),
            parse_number(self.lng.as_deref()),
        ) {
            (Raw::Value(lat), Raw::Value(lng)) => (lat, lng),
            _ => return Err(RequestError::MissingOrInvalidLocation),
        };

        let radius_km = match parse_number(self.radius_km.as_deref()) {
            Raw::Absent => policy.default_radius_km,
            Raw::Value(radius) => radius,
            Raw::Invalid => {
                return Err(RequestError::RadiusOutOfRange {
                    max_km: policy.max_radius_km,
                })
            }
        };

        let limit = match parse_count(self.limit.as_deref()) {
            Raw::Value(limit) => limit,
            Raw::Absent => policy.default_limit,
            Raw::Invalid if policy.strict_limit => return Err(RequestError::InvalidLimit),
            Raw::Invalid => policy.default_limit,
        };

        SearchQuery::new(
            latitude,
            longitude,
            radius_km,
            self.category.as_deref(),
            limit,
            policy,
        )
    }
}
