use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The browser client may be served from any origin; it authenticates with bearer tokens, not cookies.
pub fn client_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(Any)
}
