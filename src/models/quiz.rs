// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::models::question::{PublicQuestion, Question};

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: i64,

    pub title: String,

    /// The question list, stored as a JSON array.
    pub questions: Json<Vec<Question>>,

    /// SHA-256 of the serialized questions. Used to skip duplicate inserts.
    pub fingerprint: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Row shape for the quiz listing.
#[derive(Debug, Serialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub question_count: usize,
}

impl From<Quiz> for QuizSummary {
    fn from(q: Quiz) -> Self {
        QuizSummary {
            id: q.id,
            title: q.title,
            created_at: q.created_at,
            question_count: q.questions.0.len(),
        }
    }
}

/// Query parameters for `GET /api/quizzes`.
#[derive(Debug, Deserialize)]
pub struct ListQuizzesQuery {
    #[serde(default = "default_quiz_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    /// Case-insensitive title filter.
    pub q: Option<String>,
}

fn default_quiz_limit() -> i64 {
    50
}

/// Query parameters for `GET /api/questions`.
#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub quiz_id: Option<i64>,
}

/// DTO for generating a quiz from raw text.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 500000, message = "Text must be between 1 and 500000 characters."))]
    pub text: String,
}

/// Response body for upload and generate.
#[derive(Debug, Serialize)]
pub struct GeneratedQuizResponse {
    pub message: &'static str,
    pub quiz_id: i64,
    pub questions: Vec<PublicQuestion>,
}
