use async_trait::async_trait;
use locator::{
    database::{ResourceRepo, Result},
    CandidateFilter,
};
use model::{
    filter::{AttributeFilter, Facets},
    MalformedRecord, ResourceEntry, ResourceRecord, SourceRecord,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;
use crate::{
    queries::resource::{find_by_attributes, find_candidates, get, get_all},
    PgDatabaseAutocommit,
};

#[derive(Debug, Clone, FromRow)]
pub struct ResourceRow {
    pub id: String,
    pub name: String,
    pub categories: Option<String>,
    pub languages: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub cost_notes: Option<String>,
    pub eligibility: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl DatabaseRow for ResourceRow {
    type Model = ResourceRecord;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> std::result::Result<Self::Model, MalformedRecord> {
        let id = self.id;
        SourceRecord {
            id: None,
            name: Some(self.name),
            // split into tokens by `into_entry`
            categories: self.categories.into_iter().collect(),
            languages: self.languages.into_iter().collect(),
            address_line1: self.address_line1,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            phone: self.phone,
            website: self.website,
            cost_notes: self.cost_notes,
            eligibility: self.eligibility,
            lat: self.lat,
            lng: self.lng,
        }
        .into_entry(|| id)
        .map(|entry| entry.content)
    }
}

#[async_trait]
impl ResourceRepo for PgDatabaseAutocommit {
    async fn find_candidates(&mut self, filter: &CandidateFilter) -> Result<Vec<ResourceEntry>> {
        find_candidates(&self.pool, filter).await
    }

    async fn get_resource(&mut self, id: &Id<ResourceRecord>) -> Result<ResourceEntry> {
        get(&self.pool, id).await
    }

    async fn find_by_attributes(&mut self, filter: &AttributeFilter) -> Result<Vec<ResourceEntry>> {
        find_by_attributes(&self.pool, filter).await
    }

    async fn facets(&mut self) -> Result<Facets> {
        let entries = get_all(&self.pool).await?;
        Ok(Facets::collect(entries.iter().map(|entry| &entry.content)))
    }
}
