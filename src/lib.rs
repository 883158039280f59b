// src/lib.rs

pub mod ai;
pub mod config;
pub mod error;
pub mod extraction;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

// Re-export specific items for convenience if needed
pub use extraction::{ExtractionError, QuestionExtractor};
pub use routes::create_router;

/// Applies the embedded SQL migrations.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
