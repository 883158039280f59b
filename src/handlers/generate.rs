// src/handlers/generate.rs

use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use sqlx::{SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    config::DEFAULT_QUIZ_TITLE,
    error::AppError,
    extraction::QuestionExtractor,
    models::{
        question::Question,
        quiz::{GenerateQuizRequest, GeneratedQuizResponse},
    },
    utils::{fingerprint::questions_fingerprint, pdf},
};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Accepts a PDF upload and turns it into a stored quiz.
///
/// * Expects a multipart field named `file` with content type `application/pdf`.
/// * Extracts the text, asks the model for questions, stores the quiz.
/// * The quiz title is the file name without its extension.
pub async fn upload_pdf(
    State(pool): State<SqlitePool>,
    State(extractor): State<QuestionExtractor>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::BadRequest(
                "Invalid file type. Only PDFs are allowed.".to_string(),
            ));
        }
        let title = field
            .file_name()
            .map(title_from_filename)
            .unwrap_or_else(|| DEFAULT_QUIZ_TITLE.to_string());
        let bytes = field.bytes().await?;
        upload = Some((title, bytes));
        break;
    }

    let (title, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("Missing 'file' field".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    tracing::info!(title = %title, bytes = bytes.len(), "Processing PDF upload");

    let text = pdf::extract_text(bytes.to_vec()).await?;
    let response = generate_quiz(&pool, &extractor, &title, &text).await?;

    Ok(Json(response))
}

/// Generates a quiz from raw text (no PDF step).
pub async fn generate_from_text(
    State(pool): State<SqlitePool>,
    State(extractor): State<QuestionExtractor>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.text.trim().is_empty() {
        return Err(AppError::BadRequest("Text must not be blank".to_string()));
    }

    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_QUIZ_TITLE);

    let response = generate_quiz(&pool, &extractor, title, &payload.text).await?;

    Ok(Json(response))
}

/// Runs extraction and persists a non-empty result.
async fn generate_quiz(
    pool: &SqlitePool,
    extractor: &QuestionExtractor,
    title: &str,
    text: &str,
) -> Result<GeneratedQuizResponse, AppError> {
    let questions = extractor.extract(text).await?;

    if questions.is_empty() {
        return Err(AppError::Unprocessable("No questions generated".to_string()));
    }

    let quiz_id = save_quiz(pool, title, questions.as_slice()).await?;

    Ok(GeneratedQuizResponse {
        message: "File processed and questions generated successfully",
        quiz_id,
        questions: questions.to_public(),
    })
}

/// Saves a quiz, reusing an existing row with the same questions.
///
/// When the existing row still carries the default title, it takes the new one.
pub(crate) async fn save_quiz(
    pool: &SqlitePool,
    title: &str,
    questions: &[Question],
) -> Result<i64, AppError> {
    let fingerprint = questions_fingerprint(questions)?;

    let existing: Option<(i64, String)> =
        sqlx::query_as("SELECT id, title FROM quizzes WHERE fingerprint = ? ORDER BY id LIMIT 1")
            .bind(&fingerprint)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up quiz fingerprint: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

    if let Some((id, existing_title)) = existing {
        let generic = existing_title.is_empty() || existing_title == DEFAULT_QUIZ_TITLE;
        if generic && !title.is_empty() && title != existing_title {
            sqlx::query("UPDATE quizzes SET title = ? WHERE id = ?")
                .bind(title)
                .bind(id)
                .execute(pool)
                .await?;
        }
        tracing::info!(quiz_id = id, "Reusing existing quiz with identical questions");
        return Ok(id);
    }

    let id = sqlx::query(
        "INSERT INTO quizzes (title, questions, fingerprint, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(title)
    .bind(SqlJson(questions.to_vec()))
    .bind(&fingerprint)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert quiz: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .last_insert_rowid();

    tracing::info!(quiz_id = id, count = questions.len(), "Stored new quiz");
    Ok(id)
}

fn title_from_filename(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_QUIZ_TITLE)
        .to_string()
}
