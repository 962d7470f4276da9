use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use slotbook_db::schema::initialize_database;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL must be set to run migrations")?;

    println!("Connecting to database...");
    let db_pool = slotbook_db::create_pool(&database_url).await?;

    println!("Creating appointments table and indexes...");
    initialize_database(&db_pool).await?;
    println!("Database schema initialized successfully.");

    Ok(())
}
