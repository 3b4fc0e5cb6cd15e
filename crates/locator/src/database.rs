use std::{error, future::Future, result, time::Duration};

use async_trait::async_trait;
use model::{
    filter::{AttributeFilter, Facets},
    ResourceEntry, ResourceRecord,
};
use utility::id::Id;

use crate::selector::CandidateFilter;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("not found")]
    NotFound,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Other(Box<dyn error::Error + Send + Sync>),
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Read access to the resource records.
///
/// Rows that fail the record shape checks are left out by the implementation;
/// one bad row must not fail a whole query.
#[async_trait]
pub trait ResourceRepo {
    /// Records stored inside `filter.bounding_box` whose categories contain
    /// `filter.category`, at most `filter.limit` of them, in store order.
    ///
    /// # WARNING
    ///
    /// This is a coarse filter. The box is larger than the search circle, so
    /// callers have to check the true distance themselves.
    async fn find_candidates(&mut self, filter: &CandidateFilter) -> Result<Vec<ResourceEntry>>;

    async fn get_resource(&mut self, id: &Id<ResourceRecord>) -> Result<ResourceEntry>;

    /// All records matching every set attribute filter.
    async fn find_by_attributes(&mut self, filter: &AttributeFilter) -> Result<Vec<ResourceEntry>>;

    async fn facets(&mut self) -> Result<Facets>;
}

pub trait DatabaseAutocommit: ResourceRepo {}

/// trait to implement a resource store.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
pub trait Database: Clone + Send + Sync + Sized {
    type Autocommit: DatabaseAutocommit + Send;

    fn auto(&self) -> Self::Autocommit;
}

/// Runs a store operation, giving up after `timeout`.
pub async fn bounded<T, F>(timeout: Duration, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(timeout, operation)
        .await
        .unwrap_or(Err(DatabaseError::Timeout(timeout)))
}
