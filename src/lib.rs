pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod store;
pub mod utils;

pub use server::create_app;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    auth_service::AuthService, csv_import_service::CsvImporter, test_service::TestService,
};
use crate::store::{AdminStore, InMemoryStore, PgAdminStore, PgTestStore, TestStore};
use crate::utils::token::TokenIssuer;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub test_service: TestService,
    pub csv_importer: CsvImporter,
}

impl AppState {
    pub fn new(config: Config, admins: Arc<dyn AdminStore>, tests: Arc<dyn TestStore>) -> Self {
        let auth_service = AuthService::new(admins, TokenIssuer::new(&config.jwt_secret));
        let test_service = TestService::new(tests.clone());
        let csv_importer = CsvImporter::new(tests);

        Self {
            config: Arc::new(config),
            auth_service,
            test_service,
            csv_importer,
        }
    }

    pub fn postgres(config: Config, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgAdminStore::new(pool.clone())),
            Arc::new(PgTestStore::new(pool)),
        )
    }

    /// Fresh, isolated in-memory namespace.
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(config, store.clone(), store)
    }
}
