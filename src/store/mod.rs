//! Persistence seams for admins and tests.
//!
//! Every test-store operation that reads or mutates a test is scoped by the
//! owning admin's id, so a test owned by someone else is indistinguishable
//! from one that does not exist.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::{PgAdminStore, PgTestStore};

use crate::error::Result;
use crate::models::{admin::Admin, question::Question, test::Test};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>>;

    /// Fails with `Error::Conflict` when the email is already registered.
    async fn insert(&self, admin: Admin) -> Result<Admin>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TestStore: Send + Sync {
    async fn insert(&self, test: Test) -> Result<Test>;

    /// Newest-created first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Test>>;

    async fn find_owned(&self, owner: Uuid, test_id: Uuid) -> Result<Option<Test>>;

    /// Appends the whole batch in one write. Returns `false` if no owned test matched.
    async fn append_questions(
        &self,
        owner: Uuid,
        test_id: Uuid,
        questions: Vec<Question>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Removing an absent question still bumps `updated_at`. Returns `false` if no owned test matched.
    async fn remove_question(
        &self,
        owner: Uuid,
        test_id: Uuid,
        question_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    async fn delete_owned(&self, owner: Uuid, test_id: Uuid) -> Result<bool>;
}
