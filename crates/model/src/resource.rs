use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo,
    id::{HasId, Id},
    serde::{comma_separated, lenient_f64},
};

use crate::{labels::Labels, ExampleData, WithDistance, WithId};

pub type ResourceEntry = WithId<ResourceRecord>;

/// One assistance provider (food bank, clinic, ...).
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub name: String,
    #[serde(default)]
    pub categories: Labels,
    #[serde(default)]
    pub languages: Labels,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub cost_notes: Option<String>,
    pub eligibility: Option<String>,
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "lng")]
    pub longitude: Option<f64>,
}

impl HasId for ResourceRecord {
    type IdType = String;
}

impl ResourceRecord {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            categories: Labels::default(),
            languages: Labels::default(),
            address_line1: None,
            city: None,
            state: None,
            postal_code: None,
            phone: None,
            website: None,
            cost_notes: None,
            eligibility: None,
            latitude: None,
            longitude: None,
        }
    }

    /// The coordinate pair, if both halves are present and on the globe.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if geo::is_valid_coordinate(lat, lng) => Some((lat, lng)),
            _ => None,
        }
    }

    pub fn with_distance_to(self, latitude: f64, longitude: f64) -> Option<WithDistance<Self>> {
        let (lat, lng) = self.coordinates()?;
        let distance = geo::haversine_km(latitude, longitude, lat, lng);
        Some(WithDistance::new(distance, self))
    }
}

impl ExampleData for ResourceRecord {
    fn example_data() -> Self {
        ResourceRecord {
            categories: Labels::from_delimited("food"),
            languages: Labels::from_delimited("English,Spanish,Vietnamese,Chinese"),
            address_line1: Some("750 Curtner Ave".to_owned()),
            city: Some("San Jose".to_owned()),
            state: Some("CA".to_owned()),
            postal_code: Some("95125".to_owned()),
            phone: Some("408-266-8866".to_owned()),
            website: Some("https://www.shfb.org".to_owned()),
            eligibility: Some("Open to all residents experiencing food insecurity".to_owned()),
            latitude: Some(37.2996),
            longitude: Some(-121.8786),
            ..ResourceRecord::named("Second Harvest of Silicon Valley")
        }
    }
}

/// Why a source row could not become a [`ResourceRecord`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedRecord {
    #[error("record has no name")]
    MissingName,

    #[error("coordinate ({latitude}, {longitude}) is not on the globe")]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },

    #[error("unreadable row: {0}")]
    Unreadable(String),
}

/// A record as it arrives from a spreadsheet export or json dump: every field
/// optional, labels as delimited text, coordinates possibly as strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "category",
        alias = "cat",
        deserialize_with = "comma_separated::deserialize"
    )]
    pub categories: Vec<String>,
    #[serde(
        default,
        alias = "language",
        alias = "lang",
        deserialize_with = "comma_separated::deserialize"
    )]
    pub languages: Vec<String>,
    #[serde(default, alias = "address", alias = "addressLine1")]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, alias = "zip", alias = "zipcode", alias = "postalCode")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, alias = "costNotes")]
    pub cost_notes: Option<String>,
    #[serde(default)]
    pub eligibility: Option<String>,
    #[serde(
        default,
        alias = "latitude",
        deserialize_with = "lenient_f64::deserialize_option"
    )]
    pub lat: Option<f64>,
    #[serde(
        default,
        alias = "longitude",
        alias = "long",
        deserialize_with = "lenient_f64::deserialize_option"
    )]
    pub lng: Option<f64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl SourceRecord {
    /// Runs the shape checks and builds the record. Rows without an id of
    /// their own take `fallback_id`.
    pub fn into_entry<F>(self, fallback_id: F) -> Result<ResourceEntry, MalformedRecord>
    where
        F: FnOnce() -> String,
    {
        let name = non_blank(self.name).ok_or(MalformedRecord::MissingName)?;
        if let (Some(latitude), Some(longitude)) = (self.lat, self.lng) {
            if !geo::is_valid_coordinate(latitude, longitude) {
                return Err(MalformedRecord::CoordinateOutOfRange {
                    latitude,
                    longitude,
                });
            }
        }
        let id = non_blank(self.id).unwrap_or_else(fallback_id);

        let record = ResourceRecord {
            name,
            categories: Labels::new(self.categories),
            languages: Labels::new(self.languages),
            address_line1: non_blank(self.address_line1),
            city: non_blank(self.city),
            state: non_blank(self.state),
            postal_code: non_blank(self.postal_code),
            phone: non_blank(self.phone),
            website: non_blank(self.website),
            cost_notes: non_blank(self.cost_notes),
            eligibility: non_blank(self.eligibility),
            latitude: self.lat,
            longitude: self.lng,
        };
        Ok(WithId::new(Id::new(id), record))
    }
}
