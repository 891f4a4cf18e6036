use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    middleware::{auth::require_bearer_auth, cors::client_cors},
    routes::{auth, health, openapi, test_routes},
    AppState,
};

/// Builds the full router. Shared by `main` and the integration tests.
pub fn create_app(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi::openapi_json))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let protected_api = Router::new()
        .route("/api/auth/verify", get(auth::verify))
        .route(
            "/api/tests",
            get(test_routes::list_tests).post(test_routes::create_test),
        )
        .route(
            "/api/tests/:id",
            get(test_routes::get_test).delete(test_routes::delete_test),
        )
        .route("/api/tests/:id/questions", post(test_routes::add_question))
        .route(
            "/api/tests/:id/questions/:question_id",
            delete(test_routes::delete_question),
        )
        .route("/api/tests/:id/upload-csv", post(test_routes::upload_csv))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    let uploads = ServeDir::new(&state.config.uploads_dir);
    let body_limit = state.config.max_upload_bytes;

    public_api
        .merge(protected_api)
        .nest_service("/uploads", uploads)
        .with_state(state)
        .layer(client_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
