use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use slotbook_api::{config::ApiConfig, init_tracing};
use slotbook_core::{
    calendar::BusinessCalendar,
    store::{AppointmentStore, InMemoryAppointmentStore},
};
use slotbook_db::{PgAppointmentStore, create_pool, schema::initialize_database};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize tracing for logging
    init_tracing(config.log_level)?;

    let calendar = BusinessCalendar::default();

    // PostgreSQL when configured, otherwise a process-local store
    let store: Arc<dyn AppointmentStore> = match &config.database_url {
        Some(url) => {
            info!("Using PostgreSQL appointment store");
            let db_pool = create_pool(url).await?;
            initialize_database(&db_pool).await?;
            Arc::new(PgAppointmentStore::new(db_pool, calendar))
        }
        None => {
            warn!("DATABASE_URL is not set; appointments are kept in memory only");
            Arc::new(InMemoryAppointmentStore::new(calendar))
        }
    };

    // Start API server
    slotbook_api::start_server(config, store).await?;

    Ok(())
}
