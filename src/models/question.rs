use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Label of one of the four answer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

impl AnswerKey {
    /// Case-insensitive; surrounding whitespace is significant.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_uppercase().as_str() {
            "A" => Some(AnswerKey::A),
            "B" => Some(AnswerKey::B),
            "C" => Some(AnswerKey::C),
            "D" => Some(AnswerKey::D),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl QuestionOptions {
    pub fn all_present(&self) -> bool {
        [&self.a, &self.b, &self.c, &self.d]
            .iter()
            .all(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub question_text: String,
    pub options: QuestionOptions,
    pub correct_answer: AnswerKey,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(question_text: String, options: QuestionOptions, correct_answer: AnswerKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_text,
            options,
            correct_answer,
            created_at: crate::utils::time::now(),
        }
    }
}
