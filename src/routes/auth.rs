use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload, VerifyResponse},
    error::{Error, Result},
    utils::token::Claims,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Admin registered", body = AuthResponse),
        (status = 400, description = "Invalid payload or email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterPayload>, Error>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state
        .auth_service
        .register(&payload.email, &payload.password, &payload.name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new("Admin registered successfully", session)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginPayload>, Error>,
) -> Result<impl IntoResponse> {
    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(AuthResponse::new("Login successful", session)))
}

#[utoipa::path(
    get,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn verify(Extension(claims): Extension<Claims>) -> Result<impl IntoResponse> {
    Ok(Json(VerifyResponse {
        valid: true,
        admin: claims,
    }))
}
