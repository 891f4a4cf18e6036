mod common;

use axum::http::StatusCode;
use common::TestApp;

const HEADER: &str = "questionText,option1,option2,option3,option4,correctAnswer\n";

#[tokio::test]
async fn upload_imports_only_valid_rows() {
    let app = TestApp::new();
    let (token, _) = app.register("alice@example.com").await;
    let test_id = app.create_test(&token, "Imported").await;

    let csv = format!("{HEADER}Q1,a,b,c,d,A\nQ2,a,b,c,, B\n");
    let (status, body) = app
        .upload(Some(&token), &test_id, "csvFile", "questions.csv", "text/csv", csv.as_bytes())
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["questionsCount"], 1);
    assert_eq!(body["rowsSkipped"], 1);
    assert_eq!(body["message"], "1 questions uploaded successfully");

    let (_, body) = app
        .json("GET", &format!("/api/tests/{test_id}"), Some(&token), None)
        .await;
    let questions = body["test"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["questionText"], "Q1");
    assert_eq!(questions[0]["correctAnswer"], "A");

    assert_eq!(app.staged_uploads(), 0);
}

#[tokio::test]
async fn alternate_headers_are_accepted_by_extension() {
    let app = TestApp::new();
    let (token, _) = app.register("alice@example.com").await;
    let test_id = app.create_test(&token, "Imported").await;

    let csv = "question,optionA,optionB,optionC,optionD,correct\nQ1,a,b,c,d,d\nQ2,a,b,c,d,b\n";
    let (status, body) = app
        .upload(
            Some(&token),
            &test_id,
            "csvFile",
            "export.csv",
            "application/octet-stream",
            csv.as_bytes(),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["questionsCount"], 2);
}

#[tokio::test]
async fn non_csv_upload_is_rejected() {
    let app = TestApp::new();
    let (token, _) = app.register("alice@example.com").await;
    let test_id = app.create_test(&token, "Imported").await;

    let (status, body) = app
        .upload(
            Some(&token),
            &test_id,
            "csvFile",
            "questions.json",
            "application/json",
            b"[]",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only CSV files are allowed");
    assert_eq!(app.staged_uploads(), 0);
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let app = TestApp::new();
    let (token, _) = app.register("alice@example.com").await;
    let test_id = app.create_test(&token, "Imported").await;

    let (status, body) = app
        .upload(Some(&token), &test_id, "other", "questions.csv", "text/csv", HEADER.as_bytes())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn malformed_csv_imports_nothing() {
    let app = TestApp::new();
    let (token, _) = app.register("alice@example.com").await;
    let test_id = app.create_test(&token, "Imported").await;

    let mut csv = format!("{HEADER}Q1,a,b,c,d,A\n").into_bytes();
    csv.extend_from_slice(b"Q\xff,a,b,c,d,B\n");
    let (status, body) = app
        .upload(Some(&token), &test_id, "csvFile", "questions.csv", "text/csv", &csv)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Error parsing CSV file");

    let (_, body) = app
        .json("GET", &format!("/api/tests/{test_id}"), Some(&token), None)
        .await;
    assert_eq!(body["test"]["questions"].as_array().unwrap().len(), 0);
    assert_eq!(app.staged_uploads(), 0);
}

#[tokio::test]
async fn upload_into_foreign_test_is_not_found() {
    let app = TestApp::new();
    let (alice, _) = app.register("alice@example.com").await;
    let (bob, _) = app.register("bob@example.com").await;
    let test_id = app.create_test(&alice, "Private").await;

    let csv = format!("{HEADER}Q1,a,b,c,d,A\n");
    let (status, _) = app
        .upload(Some(&bob), &test_id, "csvFile", "q.csv", "text/csv", csv.as_bytes())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .json("GET", &format!("/api/tests/{test_id}"), Some(&alice), None)
        .await;
    assert_eq!(body["test"]["questions"].as_array().unwrap().len(), 0);
    assert_eq!(app.staged_uploads(), 0);
}

#[tokio::test]
async fn upload_requires_a_token() {
    let app = TestApp::new();
    let (token, _) = app.register("alice@example.com").await;
    let test_id = app.create_test(&token, "Imported").await;

    let (status, _) = app
        .upload(None, &test_id, "csvFile", "q.csv", "text/csv", HEADER.as_bytes())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_multipart_upload_gets_a_message() {
    let app = TestApp::new();
    let (token, _) = app.register("alice@example.com").await;
    let test_id = app.create_test(&token, "Imported").await;

    let (status, body) = app
        .json(
            "POST",
            &format!("/api/tests/{test_id}/upload-csv"),
            Some(&token),
            Some(serde_json::json!({ "csvFile": "Q1,a,b,c,d,A" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
    assert_eq!(app.staged_uploads(), 0);
}
