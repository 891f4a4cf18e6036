use super::{AdminStore, TestStore};
use crate::error::{Error, Result};
use crate::models::{admin::Admin, question::Question, test::Test};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory store for tests and database-less local runs.
///
/// Each instance is an isolated namespace; clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    admins: Arc<RwLock<HashMap<String, Admin>>>,
    // Insertion order is kept so equal timestamps still list newest first.
    tests: Arc<RwLock<Vec<Test>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AdminStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admins = self.admins.read().await;
        Ok(admins.get(email).cloned())
    }

    async fn insert(&self, admin: Admin) -> Result<Admin> {
        let mut admins = self.admins.write().await;
        if admins.contains_key(&admin.email) {
            return Err(Error::Conflict("Admin already exists".to_string()));
        }
        admins.insert(admin.email.clone(), admin.clone());
        Ok(admin)
    }
}

#[async_trait::async_trait]
impl TestStore for InMemoryStore {
    async fn insert(&self, test: Test) -> Result<Test> {
        let mut tests = self.tests.write().await;
        tests.push(test.clone());
        Ok(test)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Test>> {
        let tests = self.tests.read().await;
        let mut owned: Vec<Test> = tests
            .iter()
            .rev()
            .filter(|t| t.created_by == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_owned(&self, owner: Uuid, test_id: Uuid) -> Result<Option<Test>> {
        let tests = self.tests.read().await;
        Ok(tests
            .iter()
            .find(|t| t.id == test_id && t.created_by == owner)
            .cloned())
    }

    async fn append_questions(
        &self,
        owner: Uuid,
        test_id: Uuid,
        questions: Vec<Question>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut tests = self.tests.write().await;
        let Some(test) = tests
            .iter_mut()
            .find(|t| t.id == test_id && t.created_by == owner)
        else {
            return Ok(false);
        };
        test.questions.extend(questions);
        test.updated_at = updated_at;
        Ok(true)
    }

    async fn remove_question(
        &self,
        owner: Uuid,
        test_id: Uuid,
        question_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut tests = self.tests.write().await;
        let Some(test) = tests
            .iter_mut()
            .find(|t| t.id == test_id && t.created_by == owner)
        else {
            return Ok(false);
        };
        test.questions.retain(|q| q.id != question_id);
        test.updated_at = updated_at;
        Ok(true)
    }

    async fn delete_owned(&self, owner: Uuid, test_id: Uuid) -> Result<bool> {
        let mut tests = self.tests.write().await;
        let before = tests.len();
        tests.retain(|t| !(t.id == test_id && t.created_by == owner));
        Ok(tests.len() < before)
    }
}
