use axum::{response::IntoResponse, Json};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload, VerifyResponse};
use crate::dto::test_dto::{
    AddQuestionPayload, CreateTestPayload, MessageResponse, QuestionEnvelope, TestEnvelope,
    TestListResponse, UploadCsvResponse,
};
use crate::models::admin::AdminProfile;
use crate::models::question::{AnswerKey, Question, QuestionOptions};
use crate::models::test::Test;
use crate::utils::token::Claims;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::verify,
        crate::routes::test_routes::create_test,
        crate::routes::test_routes::list_tests,
        crate::routes::test_routes::get_test,
        crate::routes::test_routes::delete_test,
        crate::routes::test_routes::add_question,
        crate::routes::test_routes::delete_question,
        crate::routes::test_routes::upload_csv,
    ),
    components(schemas(
        RegisterPayload,
        LoginPayload,
        AuthResponse,
        VerifyResponse,
        AdminProfile,
        Claims,
        CreateTestPayload,
        AddQuestionPayload,
        TestEnvelope,
        TestListResponse,
        QuestionEnvelope,
        MessageResponse,
        UploadCsvResponse,
        Test,
        Question,
        QuestionOptions,
        AnswerKey,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[axum::debug_handler]
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
