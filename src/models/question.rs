// src/models/question.rs

use serde::{Deserialize, Serialize};

use crate::config::QUESTION_LIMIT;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The text shown to the quiz-taker.
    pub question: String,

    /// Exactly four distinct options, in display order.
    pub options: Vec<String>,

    /// Full text of the correct option.
    pub correct_answer: String,
}

/// DTO for sending a question to the quiz-taker (excludes the answer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        PublicQuestion {
            question: q.question.clone(),
            options: q.options.clone(),
        }
    }
}

/// The validated, bounded output of one extraction.
///
/// Either empty or holding 1..=`QUESTION_LIMIT` fully valid questions.
/// Only the extractor builds one, so the bound holds for every instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionSet(Vec<Question>);

impl QuestionSet {
    /// Wraps questions that already passed validation, keeping at most
    /// `QUESTION_LIMIT` in their original order.
    pub(crate) fn from_validated(mut questions: Vec<Question>) -> Self {
        questions.truncate(QUESTION_LIMIT);
        QuestionSet(questions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Question> {
        self.0
    }

    pub fn to_public(&self) -> Vec<PublicQuestion> {
        self.0.iter().map(PublicQuestion::from).collect()
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
