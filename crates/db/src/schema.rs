use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const STATEMENTS: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id UUID PRIMARY KEY,
        name VARCHAR(200) NOT NULL,
        email VARCHAR(254) NOT NULL,
        phone VARCHAR(32) NULL,
        reason VARCHAR(200) NULL,
        start_time TIMESTAMP WITH TIME ZONE NOT NULL,
        end_time TIMESTAMP WITH TIME ZONE NOT NULL,
        cancelled BOOLEAN NOT NULL DEFAULT FALSE,
        owner_ref VARCHAR(255) NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT fixed_duration CHECK (end_time = start_time + INTERVAL '30 minutes')
    );
    "#,
    // At most one active appointment per slot, enforced at commit.
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_active_slot
        ON appointments(start_time) WHERE NOT cancelled;
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_appointments_start_time ON appointments(start_time);
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_appointments_name ON appointments(LOWER(name));
    "#,
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
