// src/models/result.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, types::Json};

/// Represents the 'results' table in the database.
/// Stores graded quiz attempts.
#[derive(Debug, Clone, FromRow)]
pub struct QuizResult {
    pub id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total: i64,
    pub answers: Json<Vec<GradedAnswer>>,
    pub user: Option<Json<Value>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One graded line of an attempt.
///
/// `selectedText` and `correctText` repeat `selected` and `correct` for
/// clients that render the display keys. `explanation` stays empty: stored
/// questions carry no explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub question_index: usize,
    pub question_text: String,
    pub selected: String,
    #[serde(default)]
    pub selected_text: String,
    pub correct: String,
    #[serde(default)]
    pub correct_text: String,
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: String,
}

impl GradedAnswer {
    pub fn new(
        question_index: usize,
        question_text: String,
        selected: String,
        correct: String,
        is_correct: bool,
    ) -> Self {
        Self {
            question_index,
            question_text,
            selected_text: selected.clone(),
            selected,
            correct_text: correct.clone(),
            correct,
            is_correct,
            explanation: String::new(),
        }
    }
}

/// Submitted answers: either aligned with question order, or keyed by
/// question index (`{"0": "Paris"}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubmittedAnswers {
    List(Vec<Option<String>>),
    Map(HashMap<String, Option<String>>),
}

impl SubmittedAnswers {
    /// The raw answer for question `idx`, if any.
    pub fn get(&self, idx: usize) -> Option<&str> {
        match self {
            SubmittedAnswers::List(list) => list.get(idx).and_then(|a| a.as_deref()),
            SubmittedAnswers::Map(map) => map.get(&idx.to_string()).and_then(|a| a.as_deref()),
        }
    }
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub quiz_id: i64,
    pub answers: SubmittedAnswers,
    /// Whatever the frontend knows about the user (name, email).
    pub user: Option<Value>,
}

/// Serialized form of a stored result.
#[derive(Debug, Clone, Serialize)]
pub struct ResultResponse {
    pub id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total: i64,
    pub answers: Vec<GradedAnswer>,
    pub user: Option<Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

impl From<QuizResult> for ResultResponse {
    fn from(r: QuizResult) -> Self {
        ResultResponse {
            id: r.id,
            quiz_id: r.quiz_id,
            score: r.score,
            total: r.total,
            answers: r.answers.0,
            user: r.user.map(|u| u.0),
            created_at: r.created_at,
            note: None,
        }
    }
}

/// Latest attempt, with the graded lines under `detailed` as the frontend expects.
#[derive(Debug, Serialize)]
pub struct LatestResultResponse {
    pub id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total: i64,
    pub detailed: Vec<GradedAnswer>,
    pub user: Option<Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<QuizResult> for LatestResultResponse {
    fn from(r: QuizResult) -> Self {
        LatestResultResponse {
            id: r.id,
            quiz_id: r.quiz_id,
            score: r.score,
            total: r.total,
            detailed: r.answers.0,
            user: r.user.map(|u| u.0),
            created_at: r.created_at,
        }
    }
}

/// Query parameters for `GET /api/results`.
#[derive(Debug, Deserialize)]
pub struct ListResultsQuery {
    pub quiz_id: Option<i64>,
    #[serde(default = "default_result_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_result_limit() -> i64 {
    100
}
