//! Read-only store over a dataset file loaded once at startup.
//!
//! CSV header names are trimmed and lower-cased, then matched against the
//! field names and aliases of [`SourceRecord`]. JSON datasets are an array of
//! objects with the same keys. Rows failing the shape checks are skipped and
//! counted in the [`LoadReport`].

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use locator::{
    database::{Database, DatabaseAutocommit, DatabaseError, ResourceRepo, Result},
    CandidateFilter,
};
use log::{info, warn};
use model::{
    filter::{AttributeFilter, Facets},
    MalformedRecord, ResourceEntry, ResourceRecord, SourceRecord,
};
use serde_json::{Map, Value};
use utility::id::Id;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read dataset: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse csv dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not parse json dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("json dataset must be an array of objects")]
    NotAnArray,

    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    entries: Arc<Vec<ResourceEntry>>,
}

impl MemoryDatabase {
    pub fn from_entries(entries: Vec<ResourceEntry>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Builds the store from raw rows in dataset order. Row numbers are
    /// 1-based and double as ids for rows without one.
    pub fn from_sources<I>(sources: I) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = std::result::Result<SourceRecord, MalformedRecord>>,
    {
        let mut report = LoadReport::default();
        let mut entries = vec![];
        for (index, source) in sources.into_iter().enumerate() {
            let row_number = index + 1;
            match source.and_then(|source| source.into_entry(|| row_number.to_string())) {
                Ok(entry) => {
                    report.loaded += 1;
                    entries.push(entry);
                }
                Err(why) => {
                    report.skipped += 1;
                    warn!("Skipping dataset row {}: {}", row_number, why);
                }
            }
        }
        (Self::from_entries(entries), report)
    }

    pub fn from_csv_reader<R: io::Read>(
        reader: R,
    ) -> std::result::Result<(Self, LoadReport), LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_lowercase())
            .collect();

        // every cell stays text; SourceRecord does the coercion
        let sources = reader
            .records()
            .map(|row| {
                row.map(|row| {
                    headers
                        .iter()
                        .zip(row.iter())
                        .map(|(header, cell)| (header.clone(), Value::String(cell.to_owned())))
                        .collect::<Map<_, _>>()
                })
                .map_err(|why| MalformedRecord::Unreadable(why.to_string()))
                .and_then(source_from_object)
            })
            .collect::<Vec<_>>();
        Ok(Self::from_sources(sources))
    }

    pub fn from_json_str(json: &str) -> std::result::Result<(Self, LoadReport), LoadError> {
        let Value::Array(rows) = serde_json::from_str::<Value>(json)? else {
            return Err(LoadError::NotAnArray);
        };
        let sources = rows.into_iter().map(|row| match row {
            Value::Object(object) => source_from_object(object),
            other => Err(MalformedRecord::Unreadable(format!("not an object: {other}"))),
        });
        Ok(Self::from_sources(sources))
    }

    /// Loads a `.csv` or `.json` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::result::Result<Self, LoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_lowercase);
        let (database, report) = match extension.as_deref() {
            Some("csv") => Self::from_csv_reader(File::open(path)?)?,
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        };
        info!(
            "Loaded {} resources from {} ({} rows skipped)",
            report.loaded,
            path.display(),
            report.skipped
        );
        Ok(database)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.entries.iter().map(|entry| &entry.content)
    }
}

/// Scalars other than strings are turned into text so ids and postal codes
/// written as json numbers still load.
fn source_from_object(
    mut object: Map<String, Value>,
) -> std::result::Result<SourceRecord, MalformedRecord> {
    for value in object.values_mut() {
        let text = match value {
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            _ => continue,
        };
        *value = Value::String(text);
    }
    serde_json::from_value(Value::Object(object))
        .map_err(|why| MalformedRecord::Unreadable(why.to_string()))
}

#[async_trait]
impl ResourceRepo for MemoryDatabase {
    async fn find_candidates(&mut self, filter: &CandidateFilter) -> Result<Vec<ResourceEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| filter.admits(&entry.content))
            .take(filter.limit)
            .cloned()
            .collect())
    }

    async fn get_resource(&mut self, id: &Id<ResourceRecord>) -> Result<ResourceEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.id == id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn find_by_attributes(&mut self, filter: &AttributeFilter) -> Result<Vec<ResourceEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| filter.matches(&entry.content))
            .cloned()
            .collect())
    }

    async fn facets(&mut self) -> Result<Facets> {
        Ok(Facets::collect(self.records()))
    }
}

impl DatabaseAutocommit for MemoryDatabase {}

impl Database for MemoryDatabase {
    type Autocommit = MemoryDatabase;

    fn auto(&self) -> Self::Autocommit {
        self.clone()
    }
}
