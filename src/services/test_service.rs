use std::sync::Arc;

use uuid::Uuid;

use crate::dto::test_dto::AddQuestionPayload;
use crate::error::{Error, Result};
use crate::models::question::{AnswerKey, Question, QuestionOptions};
use crate::models::test::Test;
use crate::store::TestStore;
use crate::utils::time::now;

pub(crate) fn test_not_found() -> Error {
    Error::NotFound("Test not found".to_string())
}

/// Test and question operations, always scoped to the calling admin.
#[derive(Clone)]
pub struct TestService {
    tests: Arc<dyn TestStore>,
}

impl TestService {
    pub fn new(tests: Arc<dyn TestStore>) -> Self {
        Self { tests }
    }

    pub async fn create_test(
        &self,
        admin_id: Uuid,
        title: String,
        description: Option<String>,
    ) -> Result<Test> {
        if title.is_empty() {
            return Err(Error::BadRequest("Title is required".to_string()));
        }
        let test = self
            .tests
            .insert(Test::new(admin_id, title, description))
            .await?;
        tracing::info!(test_id = %test.id, %admin_id, "test created");
        Ok(test)
    }

    pub async fn list_tests(&self, admin_id: Uuid) -> Result<Vec<Test>> {
        self.tests.list_by_owner(admin_id).await
    }

    pub async fn get_test(&self, admin_id: Uuid, test_id: Uuid) -> Result<Test> {
        self.tests
            .find_owned(admin_id, test_id)
            .await?
            .ok_or_else(test_not_found)
    }

    pub async fn add_question(
        &self,
        admin_id: Uuid,
        test_id: Uuid,
        payload: AddQuestionPayload,
    ) -> Result<Question> {
        self.get_test(admin_id, test_id).await?;

        let correct_answer = AnswerKey::parse(&payload.correct_answer).ok_or_else(|| {
            Error::BadRequest("Correct answer must be one of A, B, C or D".to_string())
        })?;
        let question = Question::new(
            payload.question_text,
            QuestionOptions {
                a: payload.option_a,
                b: payload.option_b,
                c: payload.option_c,
                d: payload.option_d,
            },
            correct_answer,
        );

        if !self
            .tests
            .append_questions(admin_id, test_id, vec![question.clone()], now())
            .await?
        {
            return Err(test_not_found());
        }
        Ok(question)
    }

    /// Absent question ids are ignored; the test's `updated_at` is bumped regardless.
    pub async fn delete_question(
        &self,
        admin_id: Uuid,
        test_id: Uuid,
        question_id: Uuid,
    ) -> Result<()> {
        if !self
            .tests
            .remove_question(admin_id, test_id, question_id, now())
            .await?
        {
            return Err(test_not_found());
        }
        Ok(())
    }

    pub async fn delete_test(&self, admin_id: Uuid, test_id: Uuid) -> Result<()> {
        if !self.tests.delete_owned(admin_id, test_id).await? {
            return Err(test_not_found());
        }
        tracing::info!(%test_id, %admin_id, "test deleted");
        Ok(())
    }
}
