use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, warn};

const MAX_CONNECT_ATTEMPTS: u32 = 5;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 0;
    let mut backoff = Duration::from_secs(2);

    loop {
        match PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                info!("Database connection established.");
                return Ok(pool);
            }
            Err(e) if attempt < MAX_CONNECT_ATTEMPTS => {
                attempt += 1;
                warn!(
                    "Database unreachable (attempt {}/{}): {}. Retrying in {:?}...",
                    attempt, MAX_CONNECT_ATTEMPTS, e, backoff
                );

                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
