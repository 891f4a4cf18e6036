use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};
use crate::models::admin::{Admin, AdminProfile};
use crate::store::AdminStore;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::{Claims, TokenIssuer};

/// Hash checked when the email is unknown, so both login failures cost one Argon2 run.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("unknown-admin-placeholder").unwrap_or_default())
}

/// Token plus the public part of the admin it was issued for.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub admin: AdminProfile,
}

#[derive(Clone)]
pub struct AuthService {
    admins: Arc<dyn AdminStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(admins: Arc<dyn AdminStore>, tokens: TokenIssuer) -> Self {
        Self { admins, tokens }
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<Session> {
        if self.admins.find_by_email(email).await?.is_some() {
            return Err(Error::Conflict("Admin already exists".to_string()));
        }

        let password_hash = hash_password(password)?;
        let admin = self
            .admins
            .insert(Admin {
                id: uuid::Uuid::new_v4(),
                email: email.to_string(),
                password_hash,
                name: name.to_string(),
                created_at: crate::utils::time::now(),
            })
            .await?;

        tracing::info!(admin_id = %admin.id, "admin registered");
        self.session_for(&admin)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let Some(admin) = self.admins.find_by_email(email).await? else {
            let _ = verify_password(password, dummy_hash());
            return Err(Error::InvalidCredentials);
        };
        if !verify_password(password, &admin.password_hash)? {
            return Err(Error::InvalidCredentials);
        }
        self.session_for(&admin)
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.tokens.verify(token)
    }

    fn session_for(&self, admin: &Admin) -> Result<Session> {
        Ok(Session {
            token: self.tokens.issue(admin.id, &admin.email)?,
            admin: AdminProfile::from(admin),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, MockAdminStore};

    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryStore::new()), TokenIssuer::new("test-secret"))
    }

    #[tokio::test]
    async fn register_then_login_returns_same_admin() {
        let auth = service();
        let registered = auth.register("a@example.com", "pw", "Alice").await.unwrap();
        let logged_in = auth.login("a@example.com", "pw").await.unwrap();

        assert_eq!(registered.admin, logged_in.admin);
        assert_eq!(auth.verify(&logged_in.token).unwrap().id, registered.admin.id);
    }

    #[tokio::test]
    async fn second_registration_conflicts_and_keeps_first() {
        let auth = service();
        let first = auth.register("a@example.com", "pw", "Alice").await.unwrap();

        let err = auth
            .register("a@example.com", "other", "Mallory")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let again = auth.login("a@example.com", "pw").await.unwrap();
        assert_eq!(again.admin.id, first.admin.id);
        assert_eq!(again.admin.name, "Alice");
        assert!(auth.login("a@example.com", "other").await.is_err());
    }

    #[tokio::test]
    async fn bad_password_and_unknown_email_look_the_same() {
        let auth = service();
        auth.register("a@example.com", "pw", "Alice").await.unwrap();

        let wrong = auth.login("a@example.com", "nope").await.unwrap_err();
        let unknown = auth.login("b@example.com", "pw").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, Error::InvalidCredentials));
        assert!(matches!(unknown, Error::InvalidCredentials));
    }

    #[test]
    fn dummy_hash_is_a_verifiable_phc_string() {
        let hash = dummy_hash();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("pw", hash).unwrap());
    }

    #[tokio::test]
    async fn unknown_email_still_runs_a_password_check() {
        let mut store = MockAdminStore::new();
        store.expect_find_by_email().times(1).returning(|_| Ok(None));

        let auth = AuthService::new(Arc::new(store), TokenIssuer::new("test-secret"));
        let err = auth.login("ghost@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert!(dummy_hash().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn insert_race_surfaces_as_conflict() {
        let mut store = MockAdminStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store
            .expect_insert()
            .returning(|_| Err(Error::Conflict("Admin already exists".to_string())));

        let auth = AuthService::new(Arc::new(store), TokenIssuer::new("test-secret"));
        let err = auth.register("a@example.com", "pw", "Alice").await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
