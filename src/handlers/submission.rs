// src/handlers/submission.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Value, json};
use sqlx::{SqlitePool, types::Json as SqlJson};

use crate::{
    config::RESULT_DEDUPE_WINDOW_SECS,
    error::AppError,
    handlers::quiz::find_quiz,
    models::{
        question::Question,
        result::{GradedAnswer, LatestResultResponse, QuizResult, ResultResponse, SubmitRequest, SubmittedAnswers},
    },
};

pub(crate) const RESULT_COLUMNS: &str = "id, quiz_id, score, total, answers, user, created_at";

const SKIPPED: &str = "skipped question";

/// Compares a submitted answer with the stored one, ignoring case and
/// surrounding whitespace. Blank and skipped answers never match.
fn is_correct_answer(selected: &str, correct: &str) -> bool {
    let selected = selected.trim().to_lowercase();
    if selected.is_empty() || selected == SKIPPED {
        return false;
    }
    selected == correct.trim().to_lowercase()
}

/// Grades answers against the quiz, by question index.
/// Returns (score, graded lines). Missing answers count as skipped.
pub fn grade_answers(questions: &[Question], answers: &SubmittedAnswers) -> (usize, Vec<GradedAnswer>) {
    let mut score = 0;
    let mut detailed = Vec::with_capacity(questions.len());

    for (idx, q) in questions.iter().enumerate() {
        let selected = answers.get(idx).map(str::trim).unwrap_or_default().to_string();
        let is_correct = is_correct_answer(&selected, &q.correct_answer);
        if is_correct {
            score += 1;
        }
        detailed.push(GradedAnswer::new(
            idx,
            q.question.clone(),
            selected,
            q.correct_answer.trim().to_string(),
            is_correct,
        ));
    }

    (score, detailed)
}

/// Anything that is not a JSON object is kept as `{"raw": "..."}`.
pub fn normalize_user(user: Value) -> Option<Value> {
    match user {
        Value::Null => None,
        Value::Object(_) => Some(user),
        Value::String(s) => Some(json!({ "raw": s })),
        other => Some(json!({ "raw": other.to_string() })),
    }
}

/// Grades a submission and stores the attempt.
///
/// * The quiz is loaded by `quiz_id`; answers are matched by index.
/// * An identical attempt stored within the dedupe window is returned instead of a new row.
/// * If storing fails, the grade is still returned with `error_saving`.
pub async fn submit_answers(
    State(pool): State<SqlitePool>,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&pool, req.quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let questions = &quiz.questions.0;
    let (score, detailed) = grade_answers(questions, &req.answers);
    let total = questions.len();
    let user = req.user.and_then(normalize_user);

    let saved = match save_result(&pool, quiz.id, score as i64, total as i64, &detailed, user).await {
        Ok(saved) => json!(saved),
        Err(e) => {
            tracing::error!("Failed to save result for quiz {}: {}", quiz.id, e);
            json!({
                "score": score,
                "total": total,
                "detailed": detailed,
                "error_saving": e.to_string(),
            })
        }
    };

    Ok(Json(json!({
        "score": score,
        "total": total,
        "detailed": detailed,
        "saved_result": saved,
    })))
}

async fn save_result(
    pool: &SqlitePool,
    quiz_id: i64,
    score: i64,
    total: i64,
    detailed: &[GradedAnswer],
    user: Option<Value>,
) -> Result<ResultResponse, AppError> {
    let now = chrono::Utc::now();
    let cutoff = now - chrono::Duration::seconds(RESULT_DEDUPE_WINDOW_SECS);

    let sql = format!(
        "SELECT {} FROM results WHERE quiz_id = ? AND score = ? AND total = ? ORDER BY id DESC LIMIT 20",
        RESULT_COLUMNS
    );
    let candidates: Vec<QuizResult> = sqlx::query_as(&sql)
        .bind(quiz_id)
        .bind(score)
        .bind(total)
        .fetch_all(pool)
        .await?;

    let duplicate = candidates.into_iter().find(|cand| {
        cand.created_at >= cutoff
            && cand.answers.0 == detailed
            && cand.user.as_ref().map(|u| &u.0) == user.as_ref()
    });

    if let Some(existing) = duplicate {
        tracing::info!(result_id = existing.id, "Returning existing result for duplicate submission");
        return Ok(ResultResponse {
            note: Some("returned existing result (deduped)"),
            ..ResultResponse::from(existing)
        });
    }

    let id = sqlx::query(
        "INSERT INTO results (quiz_id, score, total, answers, user, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(quiz_id)
    .bind(score)
    .bind(total)
    .bind(SqlJson(detailed.to_vec()))
    .bind(user.clone().map(SqlJson))
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(ResultResponse {
        id,
        quiz_id,
        score,
        total,
        answers: detailed.to_vec(),
        user,
        created_at: now,
        note: None,
    })
}

/// Returns the most recent attempt.
pub async fn latest_result(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let sql = format!("SELECT {} FROM results ORDER BY id DESC LIMIT 1", RESULT_COLUMNS);
    let latest: QuizResult = sqlx::query_as(&sql)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch latest result: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?
        .ok_or_else(|| AppError::NotFound("No results found".to_string()))?;

    Ok(Json(LatestResultResponse::from(latest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz() -> Vec<Question> {
        vec![
            Question {
                question: "Capital of France?".into(),
                options: vec!["Paris".into(), "Rome".into(), "Oslo".into(), "Bern".into()],
                correct_answer: "Paris".into(),
            },
            Question {
                question: "2 + 2?".into(),
                options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
                correct_answer: "4".into(),
            },
        ]
    }

    #[test]
    fn test_grade_perfect_ignores_case_and_spaces() {
        let answers = SubmittedAnswers::List(vec![Some("  paris ".into()), Some("4".into())]);
        let (score, detailed) = grade_answers(&quiz(), &answers);
        assert_eq!(score, 2);
        assert!(detailed.iter().all(|d| d.is_correct));
        assert_eq!(detailed[0].selected, "paris");
    }

    #[test]
    fn test_grade_map_with_missing_and_skipped() {
        let answers = SubmittedAnswers::Map(
            [("1".to_string(), Some("Skipped Question".to_string()))].into_iter().collect(),
        );
        let (score, detailed) = grade_answers(&quiz(), &answers);
        assert_eq!(score, 0);
        assert_eq!(detailed.len(), 2);
        assert_eq!(detailed[0].selected, "");
        assert!(!detailed[1].is_correct);
    }

    #[test]
    fn test_grade_wrong_answer() {
        let answers = SubmittedAnswers::List(vec![Some("Rome".into()), Some("4".into())]);
        let (score, detailed) = grade_answers(&quiz(), &answers);
        assert_eq!(score, 1);
        assert!(!detailed[0].is_correct);
        assert_eq!(detailed[0].correct, "Paris");
        assert_eq!(detailed[0].correct_text, "Paris");
        assert_eq!(detailed[0].selected_text, detailed[0].selected);
    }

    #[test]
    fn test_grade_extra_answers_ignored() {
        let answers = SubmittedAnswers::List(vec![Some("Paris".into()), Some("4".into()), Some("x".into())]);
        let (score, detailed) = grade_answers(&quiz(), &answers);
        assert_eq!(score, 2);
        assert_eq!(detailed.len(), 2);
    }

    #[test]
    fn test_normalize_user() {
        assert_eq!(normalize_user(Value::Null), None);
        assert_eq!(normalize_user(json!({"name": "Ada"})), Some(json!({"name": "Ada"})));
        assert_eq!(normalize_user(json!("ada@example.com")), Some(json!({"raw": "ada@example.com"})));
        assert_eq!(normalize_user(json!(42)), Some(json!({"raw": "42"})));
    }
}
