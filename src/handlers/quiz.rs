// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::AppError,
    models::{
        question::PublicQuestion,
        quiz::{ListQuizzesQuery, QuestionsQuery, Quiz, QuizSummary},
    },
};

const QUIZ_COLUMNS: &str = "id, title, questions, fingerprint, created_at";

/// Loads a quiz by id.
pub(crate) async fn find_quiz(pool: &SqlitePool, id: i64) -> Result<Option<Quiz>, AppError> {
    let sql = format!("SELECT {} FROM quizzes WHERE id = ?", QUIZ_COLUMNS);
    sqlx::query_as::<_, Quiz>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quiz {}: {:?}", id, e);
            AppError::InternalServerError(e.to_string())
        })
}

/// Returns the questions of one quiz, without answers.
///
/// The quiz must be named explicitly; there is no implicit "current" quiz.
pub async fn get_questions(
    State(pool): State<SqlitePool>,
    Query(params): Query<QuestionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = params
        .quiz_id
        .ok_or_else(|| AppError::BadRequest("quiz_id is required".to_string()))?;

    let quiz = find_quiz(&pool, quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let questions: Vec<PublicQuestion> = quiz.questions.0.iter().map(PublicQuestion::from).collect();

    Ok(Json(serde_json::json!({
        "message": "Quiz fetched",
        "quiz_id": quiz.id,
        "title": quiz.title,
        "questions": questions,
    })))
}

/// Lists stored quizzes, newest first.
///
/// * `q` filters titles case-insensitively.
/// * `limit` is clamped to 1..=500.
pub async fn list_quizzes(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListQuizzesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut query_builder =
        QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM quizzes", QUIZ_COLUMNS));

    if let Some(term) = params.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        query_builder
            .push(" WHERE lower(title) LIKE ")
            .push_bind(format!("%{}%", term.to_lowercase()));
    }

    query_builder
        .push(" ORDER BY id DESC LIMIT ")
        .push_bind(params.limit.clamp(1, 500))
        .push(" OFFSET ")
        .push_bind(params.offset.max(0));

    let rows: Vec<Quiz> = query_builder
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quizzes: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    let quizzes: Vec<QuizSummary> = rows.into_iter().map(QuizSummary::from).collect();

    Ok(Json(serde_json::json!({ "quizzes": quizzes })))
}
