pub mod client;
pub mod database;
pub mod query;
pub mod ranking;
pub mod selector;

#[cfg(test)]
mod testing;

pub use client::{Client, SearchOutcome};
pub use query::{SearchParams, SearchPolicy, SearchQuery};
pub use ranking::{RankedResult, Ranking};
pub use selector::CandidateFilter;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Missing or invalid lat/lng. Example: ?lat=37.33&lng=-121.88&category=food&radiusKm=5")]
    MissingOrInvalidLocation,

    #[error("radiusKm must be greater than 0 and at most {max_km}")]
    RadiusOutOfRange { max_km: f64 },

    #[error("limit must be a positive integer")]
    InvalidLimit,

    #[error("The requested item does not exist.")]
    NotFound,

    #[error("resource store unavailable: {0}")]
    StoreUnavailable(String),
}

impl RequestError {
    /// Errors caused by the request itself; retrying them unchanged is pointless.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::MissingOrInvalidLocation | Self::RadiusOutOfRange { .. } | Self::InvalidLimit
        )
    }
}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::Timeout(after) => {
                Self::StoreUnavailable(format!("no answer within {} ms", after.as_millis()))
            }
            database::DatabaseError::Other(why) => Self::StoreUnavailable(why.to_string()),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
