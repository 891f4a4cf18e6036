use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::Error, AppState};

/// Requires `Authorization: Bearer <token>` and stores the verified `Claims`
/// in request extensions. Missing token → 401, bad or expired token → 403.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_whitespace().nth(1))
        .map(str::to_owned);

    let Some(token) = token else {
        return Error::MissingToken.into_response();
    };

    match state.auth_service.verify(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected bearer token");
            err.into_response()
        }
    }
}
