use std::{io, time::Duration};

use async_trait::async_trait;
use model::{
    filter::{AttributeFilter, Facets},
    ResourceEntry, ResourceRecord, WithId,
};
use utility::id::Id;

use crate::{
    database::{Database, DatabaseAutocommit, DatabaseError, ResourceRepo, Result},
    selector::CandidateFilter,
};

pub fn located(name: &str, latitude: f64, longitude: f64) -> ResourceRecord {
    ResourceRecord {
        latitude: Some(latitude),
        longitude: Some(longitude),
        ..ResourceRecord::named(name)
    }
}

pub fn entry(id: &str, record: ResourceRecord) -> ResourceEntry {
    WithId::new(Id::new(id.to_owned()), record)
}

/// In-memory store over a fixed list, in list order.
#[derive(Debug, Clone, Default)]
pub struct VecStore(pub Vec<ResourceEntry>);

impl VecStore {
    pub fn new(entries: Vec<ResourceEntry>) -> Self {
        Self(entries)
    }
}

#[async_trait]
impl ResourceRepo for VecStore {
    async fn find_candidates(&mut self, filter: &CandidateFilter) -> Result<Vec<ResourceEntry>> {
        Ok(self
            .0
            .iter()
            .filter(|entry| filter.admits(&entry.content))
            .take(filter.limit)
            .cloned()
            .collect())
    }

    async fn get_resource(&mut self, id: &Id<ResourceRecord>) -> Result<ResourceEntry> {
        self.0
            .iter()
            .find(|entry| &entry.id == id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn find_by_attributes(&mut self, filter: &AttributeFilter) -> Result<Vec<ResourceEntry>> {
        Ok(self
            .0
            .iter()
            .filter(|entry| filter.matches(&entry.content))
            .cloned()
            .collect())
    }

    async fn facets(&mut self) -> Result<Facets> {
        Ok(Facets::collect(self.0.iter().map(|entry| &entry.content)))
    }
}

impl DatabaseAutocommit for VecStore {}

impl Database for VecStore {
    type Autocommit = VecStore;

    fn auto(&self) -> Self::Autocommit {
        self.clone()
    }
}

fn refused() -> DatabaseError {
    DatabaseError::Other(Box::new(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        "connection refused",
    )))
}

/// Every call fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingStore;

#[async_trait]
impl ResourceRepo for FailingStore {
    async fn find_candidates(&mut self, _: &CandidateFilter) -> Result<Vec<ResourceEntry>> {
        Err(refused())
    }

    async fn get_resource(&mut self, _: &Id<ResourceRecord>) -> Result<ResourceEntry> {
        Err(refused())
    }

    async fn find_by_attributes(&mut self, _: &AttributeFilter) -> Result<Vec<ResourceEntry>> {
        Err(refused())
    }

    async fn facets(&mut self) -> Result<Facets> {
        Err(refused())
    }
}

impl DatabaseAutocommit for FailingStore {}

impl Database for FailingStore {
    type Autocommit = FailingStore;

    fn auto(&self) -> Self::Autocommit {
        *self
    }
}

/// Every call answers after the given delay.
#[derive(Debug, Clone, Copy)]
pub struct SlowStore(pub Duration);

#[async_trait]
impl ResourceRepo for SlowStore {
    async fn find_candidates(&mut self, _: &CandidateFilter) -> Result<Vec<ResourceEntry>> {
        tokio::time::sleep(self.0).await;
        Ok(vec![])
    }

    async fn get_resource(&mut self, _: &Id<ResourceRecord>) -> Result<ResourceEntry> {
        tokio::time::sleep(self.0).await;
        Err(DatabaseError::NotFound)
    }

    async fn find_by_attributes(&mut self, _: &AttributeFilter) -> Result<Vec<ResourceEntry>> {
        tokio::time::sleep(self.0).await;
        Ok(vec![])
    }

    async fn facets(&mut self) -> Result<Facets> {
        tokio::time::sleep(self.0).await;
        Ok(Facets::default())
    }
}

impl DatabaseAutocommit for SlowStore {}

impl Database for SlowStore {
    type Autocommit = SlowStore;

    fn auto(&self) -> Self::Autocommit {
        *self
    }
}
