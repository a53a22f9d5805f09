//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use asseto_web::config::get_database_url;
use sqlx::PgPool;

/// Connect to the database named by `ASSETO_DATABASE_URL` (or `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = get_database_url("ASSETO_DATABASE_URL")?;

    tracing::info!("Connecting to database...");
    Ok(asseto_web::db::create_pool(&database_url).await?)
}
