use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{question::Question, test::Test};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateTestPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
}

/// Manual question entry. Option texts are stored verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AddQuestionPayload {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub test: Test,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestListResponse {
    pub tests: Vec<Test>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionEnvelope {
    pub message: String,
    pub question: Question,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadCsvResponse {
    pub message: String,
    pub questions_count: usize,
    pub rows_skipped: usize,
}
