use std::error::Error;

use database::{Backend, DatabaseConnectionInfo, MemoryDatabase, PgDatabase};
use locator::Client;
use log::info;
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = WebConfig::from_env()?;

    // database
    let backend: Backend = match &config.dataset {
        Some(dataset) => {
            info!("Serving resources from {}", dataset.display());
            MemoryDatabase::from_path(dataset)?.into()
        }
        None => {
            let database_connection_info = DatabaseConnectionInfo::from_env()
                .ok_or("expected LOCATOR_DATASET or database connection info in env.")?;
            PgDatabase::connect(database_connection_info).await?.into()
        }
    };

    let client = Client::new(backend)
        .with_policy(config.policy.clone())
        .with_store_timeout(config.store_timeout);

    // web server
    start_web_server(
        &config,
        WebState {
            locator_client: client,
        },
    )
    .await?;

    Ok(())
}
