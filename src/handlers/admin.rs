// src/handlers/admin.rs

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::AppError,
    handlers::submission::RESULT_COLUMNS,
    models::result::{ListResultsQuery, QuizResult, ResultResponse},
};

/// Deletes a quiz and every result recorded against it.
/// Admin only.
pub async fn delete_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM results WHERE quiz_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete quiz: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    tx.commit().await?;
    tracing::info!(quiz_id = id, "Deleted quiz");

    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// Identifies who took a quiz: email, then name, then raw text.
pub fn user_key(user: Option<&Value>) -> String {
    let Some(obj) = user.and_then(Value::as_object) else {
        return String::new();
    };
    ["email", "name", "raw"]
        .iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_lowercase()
}

/// Drops attempts whose (quiz, user, score, total, timestamp) was already seen.
/// Keeps the first occurrence, so the input order decides which row survives.
fn dedupe_results(rows: Vec<QuizResult>) -> Vec<QuizResult> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|r| {
            let key = format!(
                "{}|{}|{}|{}|{}",
                r.quiz_id,
                user_key(r.user.as_ref().map(|u| &u.0)),
                r.score,
                r.total,
                r.created_at.to_rfc3339()
            );
            seen.insert(key)
        })
        .collect()
}

/// Lists saved attempts, newest first, optionally for one quiz.
/// Admin only.
pub async fn list_results(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListResultsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut query_builder =
        QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM results", RESULT_COLUMNS));

    if let Some(quiz_id) = params.quiz_id {
        query_builder.push(" WHERE quiz_id = ").push_bind(quiz_id);
    }

    query_builder
        .push(" ORDER BY id DESC LIMIT ")
        .push_bind(params.limit.clamp(1, 1000))
        .push(" OFFSET ")
        .push_bind(params.offset.max(0));

    let rows: Vec<QuizResult> = query_builder
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list results: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    let results: Vec<ResultResponse> = dedupe_results(rows)
        .into_iter()
        .map(ResultResponse::from)
        .collect();

    Ok(Json(serde_json::json!({ "results": results })))
}

/// Deletes a single result by ID.
/// Admin only.
pub async fn delete_result(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM results WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete result: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Result not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted_result": id })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::GradedAnswer;
    use serde_json::json;
    use sqlx::types::Json as SqlJson;

    fn row(id: i64, user: Option<Value>, created_at: chrono::DateTime<chrono::Utc>) -> QuizResult {
        QuizResult {
            id,
            quiz_id: 1,
            score: 3,
            total: 5,
            answers: SqlJson(Vec::<GradedAnswer>::new()),
            user: user.map(SqlJson),
            created_at,
        }
    }

    #[test]
    fn test_user_key_prefers_email() {
        let user = json!({"name": "Ada", "email": " ADA@Example.com "});
        assert_eq!(user_key(Some(&user)), "ada@example.com");
        assert_eq!(user_key(Some(&json!({"name": "Ada", "email": ""}))), "ada");
        assert_eq!(user_key(Some(&json!({"raw": "Guest"}))), "guest");
        assert_eq!(user_key(None), "");
    }

    #[test]
    fn test_dedupe_results_keeps_first() {
        let t = chrono::Utc::now();
        let later = t + chrono::Duration::seconds(5);
        let rows = vec![
            row(3, Some(json!({"email": "a@x.io"})), t),
            row(2, Some(json!({"email": "A@x.io", "name": "Other"})), t),
            row(1, Some(json!({"email": "a@x.io"})), later),
        ];
        let kept: Vec<i64> = dedupe_results(rows).iter().map(|r| r.id).collect();
        assert_eq!(kept, vec![3, 1]);
    }
}
