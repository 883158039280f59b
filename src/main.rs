// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use pdf_quiz_backend::ai::{CompletionClient, DisabledClient, GeminiClient};
use pdf_quiz_backend::config::Config;
use pdf_quiz_backend::extraction::QuestionExtractor;
use pdf_quiz_backend::state::AppState;
use pdf_quiz_backend::{routes, run_migrations};
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to open database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Completion client: real Gemini when a key is configured
    let client: Arc<dyn CompletionClient> = match GeminiClient::from_config(&config) {
        Some(gemini) => {
            tracing::info!("Using Gemini model {}", gemini.model());
            Arc::new(gemini)
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; question generation is disabled");
            Arc::new(DisabledClient)
        }
    };

    // Create AppState
    let state = AppState {
        pool,
        config: config.clone(),
        extractor: QuestionExtractor::new(client),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}
