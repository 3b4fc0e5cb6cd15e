use std::time::Duration;

use log::{debug, warn};
use model::{ResourceEntry, ResourceRecord};
use utility::geo::{self, BoundingBox};

use crate::{
    database::{self, ResourceRepo},
    RequestError, RequestResult, SearchQuery,
};

/// Coarse prefilter handed to a store: everything inside the box, optionally
/// restricted to a category fragment, at most `limit` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFilter {
    pub bounding_box: BoundingBox,
    /// Lower-cased substring looked for in each category token.
    pub category: Option<String>,
    pub limit: usize,
}

impl CandidateFilter {
    pub fn for_query(query: &SearchQuery) -> Self {
        Self {
            bounding_box: geo::bounding_box(query.latitude(), query.longitude(), query.radius_km()),
            category: query.category().map(str::to_owned),
            limit: query.limit(),
        }
    }

    /// Whether a store should hand out `record` for this filter.
    /// Records without a usable coordinate pair are never admitted.
    pub fn admits(&self, record: &ResourceRecord) -> bool {
        let inside = record
            .coordinates()
            .is_some_and(|(lat, lng)| self.bounding_box.contains(lat, lng));
        inside
            && self
                .category
                .as_deref()
                .map_or(true, |category| record.categories.contains_fragment(category))
    }
}

/// Fetches the candidates for `filter`. Store failures and timeouts turn
/// into [`RequestError::StoreUnavailable`]; partial results are never returned.
pub async fn select_candidates<R>(
    repo: &mut R,
    filter: &CandidateFilter,
    timeout: Duration,
) -> RequestResult<Vec<ResourceEntry>>
where
    R: ResourceRepo + Send,
{
    match database::bounded(timeout, repo.find_candidates(filter)).await {
        Ok(mut candidates) => {
            candidates.truncate(filter.limit);
            debug!(
                "{} candidates inside {:?} (category {:?})",
                candidates.len(),
                filter.bounding_box,
                filter.category
            );
            Ok(candidates)
        }
        Err(why) => {
            warn!("Candidate selection failed: {why}");
            Err(match RequestError::from(why) {
                RequestError::NotFound => {
                    RequestError::StoreUnavailable("resource table is missing".to_owned())
                }
                other => other,
            })
        }
    }
}
