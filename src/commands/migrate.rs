//! Database migration command.

use keepsake_core::config::AppConfig;
use keepsake_core::result::AppResult;
use keepsake_database::DatabasePool;
use keepsake_database::connection::mask_password;

use crate::output;

/// Run all pending migrations.
pub async fn execute(config: &AppConfig) -> AppResult<()> {
    println!("Running migrations against {}", mask_password(&config.database.url));
    let db = DatabasePool::connect(&config.database).await?;
    keepsake_database::migration::run_migrations(db.pool()).await?;
    db.close().await;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
