use super::{AdminStore, TestStore};
use crate::error::{Error, Result};
use crate::models::{admin::Admin, question::Question, test::Test};
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

#[derive(Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AdminStore for PgAdminStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"SELECT id, email, password_hash, name, created_at FROM admins WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn insert(&self, admin: Admin) -> Result<Admin> {
        let inserted = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, email, password_hash, name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, created_at
            "#,
        )
        .bind(admin.id)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.name)
        .bind(admin.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db) = &err {
                if db.is_unique_violation() {
                    return Error::Conflict("Admin already exists".to_string());
                }
            }
            Error::from(err)
        })?;
        Ok(inserted)
    }
}

#[derive(FromRow)]
struct TestRow {
    id: Uuid,
    title: String,
    description: String,
    questions: Json<Vec<Question>>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TestRow> for Test {
    fn from(row: TestRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            questions: row.questions.0,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgTestStore {
    pool: PgPool,
}

impl PgTestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TestStore for PgTestStore {
    async fn insert(&self, test: Test) -> Result<Test> {
        let row = sqlx::query_as::<_, TestRow>(
            r#"
            INSERT INTO tests (id, title, description, questions, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, questions, created_by, created_at, updated_at
            "#,
        )
        .bind(test.id)
        .bind(&test.title)
        .bind(&test.description)
        .bind(Json(&test.questions))
        .bind(test.created_by)
        .bind(test.created_at)
        .bind(test.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Test>> {
        let rows = sqlx::query_as::<_, TestRow>(
            r#"
            SELECT id, title, description, questions, created_by, created_at, updated_at
            FROM tests
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_owned(&self, owner: Uuid, test_id: Uuid) -> Result<Option<Test>> {
        let row = sqlx::query_as::<_, TestRow>(
            r#"
            SELECT id, title, description, questions, created_by, created_at, updated_at
            FROM tests
            WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(test_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn append_questions(
        &self,
        owner: Uuid,
        test_id: Uuid,
        questions: Vec<Question>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        // Single statement: the batch lands entirely or not at all.
        let result = sqlx::query(
            r#"
            UPDATE tests
            SET questions = questions || $1::jsonb,
                updated_at = $2
            WHERE id = $3 AND created_by = $4
            "#,
        )
        .bind(Json(&questions))
        .bind(updated_at)
        .bind(test_id)
        .bind(owner)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_question(
        &self,
        owner: Uuid,
        test_id: Uuid,
        question_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tests
            SET questions = COALESCE(
                    (SELECT jsonb_agg(elem.q ORDER BY elem.pos)
                     FROM jsonb_array_elements(questions) WITH ORDINALITY AS elem(q, pos)
                     WHERE elem.q->>'id' <> $1),
                    '[]'::jsonb),
                updated_at = $2
            WHERE id = $3 AND created_by = $4
            "#,
        )
        .bind(question_id.to_string())
        .bind(updated_at)
        .bind(test_id)
        .bind(owner)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_owned(&self, owner: Uuid, test_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tests WHERE id = $1 AND created_by = $2")
            .bind(test_id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
