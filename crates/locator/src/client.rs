use std::time::Duration;

use log::debug;
use model::{
    filter::{AttributeFilter, Facets},
    ResourceEntry, ResourceRecord,
};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    database::{self, Database, ResourceRepo},
    ranking::{self, RankedResult},
    selector::{self, CandidateFilter},
    RequestResult, SearchParams, SearchPolicy, SearchQuery,
};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// A validated query together with its ranked results.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: SearchQuery,
    pub results: Vec<RankedResult>,
}

#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database + Send + Sync + Sized + 'static,
{
    pub database: D,
    policy: SearchPolicy,
    store_timeout: Duration,
}

impl<D> Client<D>
where
    D: Database + 'static,
{
    pub fn new(database: D) -> Self {
        Self {
            database,
            policy: SearchPolicy::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_policy(self, policy: SearchPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn with_store_timeout(self, store_timeout: Duration) -> Self {
        Self {
            store_timeout,
            ..self
        }
    }

    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Validates `params` and runs the search. Invalid input is reported
    /// before the store is touched.
    pub async fn search(&self, params: &SearchParams) -> RequestResult<SearchOutcome> {
        let query = params.normalize(&self.policy)?;
        let results = self.search_query(&query).await?;
        Ok(SearchOutcome { query, results })
    }

    pub async fn search_query(&self, query: &SearchQuery) -> RequestResult<Vec<RankedResult>> {
        let filter = CandidateFilter::for_query(query);
        let candidates =
            selector::select_candidates(&mut self.database.auto(), &filter, self.store_timeout)
                .await?;
        let candidate_count = candidates.len();
        let ranking = ranking::rank_query(query, candidates);
        debug!(
            "Ranked {} of {} candidates ({} without location, {} outside {} km)",
            ranking.results.len(),
            candidate_count,
            ranking.unlocated,
            ranking.outside_radius,
            query.radius_km()
        );
        Ok(ranking.results)
    }

    /// Records matching every set attribute. Without any filter nothing is
    /// returned rather than the whole store.
    pub async fn browse(&self, filter: &AttributeFilter) -> RequestResult<Vec<ResourceEntry>> {
        if filter.is_empty() {
            return Ok(vec![]);
        }
        let mut auto = self.database.auto();
        database::bounded(self.store_timeout, auto.find_by_attributes(filter))
            .await?
            .let_owned(|entries| {
                debug!("{} records match {:?}", entries.len(), filter);
                Ok(entries)
            })
    }

    pub async fn get_resource(&self, id: &Id<ResourceRecord>) -> RequestResult<ResourceEntry> {
        let mut auto = self.database.auto();
        Ok(database::bounded(self.store_timeout, auto.get_resource(id)).await?)
    }

    pub async fn facets(&self) -> RequestResult<Facets> {
        let mut auto = self.database.auto();
        Ok(database::bounded(self.store_timeout, auto.facets()).await?)
    }
}
