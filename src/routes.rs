// src/routes.rs

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, generate, quiz, submission},
    state::AppState,
    utils::admin::admin_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (generation, quiz-taking, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool, Config, Extractor).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let generation_routes = Router::new()
        .route(
            "/upload",
            post(generate::upload_pdf)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/generate", post(generate::generate_from_text));

    let quiz_routes = Router::new()
        .route("/questions", get(quiz::get_questions))
        .route("/quizzes", get(quiz::list_quizzes))
        .route("/submit", post(submission::submit_answers))
        .route("/results/latest", get(submission::latest_result));

    let admin_routes = Router::new()
        .route("/quizzes/{id}", delete(admin::delete_quiz))
        .route("/results", get(admin::list_results))
        .route("/results/{id}", delete(admin::delete_result))
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware));

    let api = Router::new()
        .merge(generation_routes)
        .merge(quiz_routes)
        .merge(admin_routes);

    Router::new()
        .route("/", get(health))
        .nest("/api", api)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "PDF quiz backend running" }))
}
