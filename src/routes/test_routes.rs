use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    dto::test_dto::{
        AddQuestionPayload, CreateTestPayload, MessageResponse, QuestionEnvelope, TestEnvelope,
        TestListResponse, UploadCsvResponse,
    },
    error::{Error, Result},
    services::test_service::test_not_found,
    utils::{token::Claims, upload},
    AppState,
};

const CSV_FIELD: &str = "csvFile";

/// Ids that are not UUIDs cannot name a stored test.
fn parse_test_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| test_not_found())
}

#[utoipa::path(
    post,
    path = "/api/tests",
    request_body = CreateTestPayload,
    responses(
        (status = 201, description = "Test created", body = TestEnvelope),
        (status = 400, description = "Title missing")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn create_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateTestPayload>, Error>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let test = state
        .test_service
        .create_test(claims.id, payload.title, payload.description)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TestEnvelope {
            message: Some("Test created successfully".to_string()),
            test,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/tests",
    responses((status = 200, description = "Tests owned by the caller, newest first", body = TestListResponse)),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn list_tests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let tests = state.test_service.list_tests(claims.id).await?;
    Ok(Json(TestListResponse { tests }))
}

#[utoipa::path(
    get,
    path = "/api/tests/{id}",
    params(("id" = Uuid, Path, description = "Test ID")),
    responses(
        (status = 200, description = "Test found", body = TestEnvelope),
        (status = 404, description = "Test not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let test = state
        .test_service
        .get_test(claims.id, parse_test_id(&id)?)
        .await?;
    Ok(Json(TestEnvelope {
        message: None,
        test,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/tests/{id}",
    params(("id" = Uuid, Path, description = "Test ID")),
    responses(
        (status = 200, description = "Test deleted", body = MessageResponse),
        (status = 404, description = "Test not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn delete_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state
        .test_service
        .delete_test(claims.id, parse_test_id(&id)?)
        .await?;
    Ok(Json(MessageResponse {
        message: "Test deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/tests/{id}/questions",
    params(("id" = Uuid, Path, description = "Test ID")),
    request_body = AddQuestionPayload,
    responses(
        (status = 201, description = "Question added", body = QuestionEnvelope),
        (status = 400, description = "Correct answer is not one of A-D"),
        (status = 404, description = "Test not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn add_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<AddQuestionPayload>, Error>,
) -> Result<impl IntoResponse> {
    let question = state
        .test_service
        .add_question(claims.id, parse_test_id(&id)?, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(QuestionEnvelope {
            message: "Question added successfully".to_string(),
            question,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/tests/{id}/questions/{question_id}",
    params(
        ("id" = Uuid, Path, description = "Test ID"),
        ("question_id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question removed (or was already absent)", body = MessageResponse),
        (status = 404, description = "Test not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((test_id, question_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let test_id = parse_test_id(&test_id)?;
    // Non-UUID ids match no question.
    let question_id = Uuid::parse_str(&question_id).unwrap_or(Uuid::nil());
    state
        .test_service
        .delete_question(claims.id, test_id, question_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Question deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/tests/{id}/upload-csv",
    params(("id" = Uuid, Path, description = "Test ID")),
    request_body(content = String, content_type = "multipart/form-data", description = "CSV file in the `csvFile` field"),
    responses(
        (status = 200, description = "Questions imported", body = UploadCsvResponse),
        (status = 400, description = "No file, not a CSV, or unparsable CSV"),
        (status = 404, description = "Test not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn upload_csv(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    WithRejection(mut multipart, _): WithRejection<Multipart, Error>,
) -> Result<impl IntoResponse> {
    let test_id = parse_test_id(&id)?;

    let mut staged = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(CSV_FIELD) {
            continue;
        }
        if !upload::is_csv(field.content_type(), field.file_name()) {
            return Err(Error::BadRequest("Only CSV files are allowed".to_string()));
        }
        staged = Some(upload::stage_field(&state.config.uploads_dir, field).await?);
        break;
    }
    let Some(path) = staged else {
        return Err(Error::BadRequest("No file uploaded".to_string()));
    };

    let summary = state
        .csv_importer
        .import_file(claims.id, test_id, &path)
        .await?;
    Ok(Json(UploadCsvResponse {
        message: format!("{} questions uploaded successfully", summary.imported),
        questions_count: summary.imported,
        rows_skipped: summary.skipped,
    }))
}
