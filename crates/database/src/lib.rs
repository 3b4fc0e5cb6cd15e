use std::{env, error::Error};

use async_trait::async_trait;
use locator::{
    database::{Database, DatabaseAutocommit, ResourceRepo, Result},
    CandidateFilter,
};
use log::info;
use model::{
    filter::{AttributeFilter, Facets},
    ResourceEntry, ResourceRecord,
};
use utility::id::Id;

pub mod data_model;
pub mod memory;
pub mod queries;

pub use memory::{LoadError, LoadReport, MemoryDatabase};

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl DatabaseAutocommit for PgDatabaseAutocommit {}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> std::result::Result<Self, Box<dyn Error>> {
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Connected to postgres, migrations applied");

        Ok(Self { connection: pool })
    }
}

impl Database for PgDatabase {
    type Autocommit = PgDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }
}

/// The store picked at startup.
#[derive(Debug, Clone)]
pub enum Backend {
    Postgres(PgDatabase),
    Memory(MemoryDatabase),
}

pub enum BackendAutocommit {
    Postgres(PgDatabaseAutocommit),
    Memory(MemoryDatabase),
}

impl From<PgDatabase> for Backend {
    fn from(value: PgDatabase) -> Self {
        Self::Postgres(value)
    }
}

impl From<MemoryDatabase> for Backend {
    fn from(value: MemoryDatabase) -> Self {
        Self::Memory(value)
    }
}

impl Database for Backend {
    type Autocommit = BackendAutocommit;

    fn auto(&self) -> Self::Autocommit {
        match self {
            Self::Postgres(database) => BackendAutocommit::Postgres(database.auto()),
            Self::Memory(database) => BackendAutocommit::Memory(database.auto()),
        }
    }
}

impl DatabaseAutocommit for BackendAutocommit {}

#[async_trait]
impl ResourceRepo for BackendAutocommit {
    async fn find_candidates(&mut self, filter: &CandidateFilter) -> Result<Vec<ResourceEntry>> {
        match self {
            Self::Postgres(auto) => auto.find_candidates(filter).await,
            Self::Memory(auto) => auto.find_candidates(filter).await,
        }
    }

    async fn get_resource(&mut self, id: &Id<ResourceRecord>) -> Result<ResourceEntry> {
        match self {
            Self::Postgres(auto) => auto.get_resource(id).await,
            Self::Memory(auto) => auto.get_resource(id).await,
        }
    }

    async fn find_by_attributes(&mut self, filter: &AttributeFilter) -> Result<Vec<ResourceEntry>> {
        match self {
            Self::Postgres(auto) => auto.find_by_attributes(filter).await,
            Self::Memory(auto) => auto.find_by_attributes(filter).await,
        }
    }

    async fn facets(&mut self) -> Result<Facets> {
        match self {
            Self::Postgres(auto) => auto.facets().await,
            Self::Memory(auto) => auto.facets().await,
        }
    }
}
