use crate::fixtures::test_app::TestApp;
use bson::doc;
use serde_json::Value;

async fn request_document(app: &TestApp, org: &crate::fixtures::seed::SeededOrg) -> (String, String) {
    let case = app.seed_case(org, "Asylum filing").await;
    let case_id = case["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_post("/api/documents/request", &org.staff.access_token)
        .json(&serde_json::json!({
            "case_id": case_id,
            "name": "Passport scan",
            "is_required": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    (json["id"].as_str().unwrap().to_string(), case_id)
}

fn pdf_part() -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(b"%PDF-1.4 fake".to_vec())
        .file_name("passport.pdf")
        .mime_str("application/pdf")
        .unwrap();
    reqwest::multipart::Form::new().part("file", part)
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn request_upload_review_flow() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    let (document_id, _case_id) = request_document(&app, &org).await;

    // The client uploads against the request.
    let resp = app
        .auth_post(
            &format!("/api/documents/{document_id}/upload"),
            &org.client.access_token,
        )
        .multipart(pdf_part())
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.status().as_u16(),
        200,
        "Upload failed: {}",
        resp.text().await.unwrap_or_default()
    );
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "submitted");
    assert!(json["url"].as_str().unwrap().starts_with("/api/documents/payload/"));

    // Staff approves.
    let resp = app
        .auth_patch(
            &format!("/api/documents/{document_id}"),
            &org.staff.access_token,
        )
        .json(&serde_json::json!({ "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "approved");

    // The payload downloads for the owning client.
    let url = json["url"].as_str().unwrap().to_string();
    let resp = app.auth_get(&url, &org.client.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"%PDF-1.4 fake");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn approval_emits_exactly_one_notification_and_activity_row() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    let (document_id, _case_id) = request_document(&app, &org).await;

    app.auth_post(
        &format!("/api/documents/{document_id}/upload"),
        &org.client.access_token,
    )
    .multipart(pdf_part())
    .send()
    .await
    .unwrap();

    let resp = app
        .auth_patch(
            &format!("/api/documents/{document_id}"),
            &org.staff.access_token,
        )
        .json(&serde_json::json!({ "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let reviewed_activity = app
        .db
        .collection::<bson::Document>("activity_logs")
        .count_documents(doc! { "action": "document_reviewed" })
        .await
        .unwrap();
    assert_eq!(reviewed_activity, 1);

    let review_notifications = app
        .db
        .collection::<bson::Document>("notifications")
        .count_documents(doc! { "title": "Document reviewed" })
        .await
        .unwrap();
    assert_eq!(review_notifications, 1);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn oversized_upload_rejected_with_413() {
    let app = TestApp::spawn_with_settings(|settings| {
        settings.storage.max_upload_bytes = 8;
    })
    .await;
    let org = app.seed_org("acme").await;
    let (document_id, _case_id) = request_document(&app, &org).await;

    let resp = app
        .auth_post(
            &format!("/api/documents/{document_id}/upload"),
            &org.client.access_token,
        )
        .multipart(pdf_part())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 413);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn unknown_content_type_rejected_with_415() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    let (document_id, _case_id) = request_document(&app, &org).await;

    let part = reqwest::multipart::Part::bytes(b"MZ fake binary".to_vec())
        .file_name("virus.exe")
        .mime_str("application/x-msdownload")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let resp = app
        .auth_post(
            &format!("/api/documents/{document_id}/upload"),
            &org.client.access_token,
        )
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 415);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn client_cannot_run_review_transitions() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    let (document_id, _case_id) = request_document(&app, &org).await;

    let resp = app
        .auth_patch(
            &format!("/api/documents/{document_id}"),
            &org.client.access_token,
        )
        .json(&serde_json::json!({ "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn delete_removes_the_stored_payload() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    let (document_id, _case_id) = request_document(&app, &org).await;

    let resp = app
        .auth_post(
            &format!("/api/documents/{document_id}/upload"),
            &org.client.access_token,
        )
        .multipart(pdf_part())
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let url = json["url"].as_str().unwrap().to_string();

    let resp = app
        .auth_delete(
            &format!("/api/documents/{document_id}"),
            &org.staff.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app.auth_get(&url, &org.client.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn ai_review_unconfigured_is_a_clean_upstream_error() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    let (document_id, _case_id) = request_document(&app, &org).await;

    app.auth_post(
        &format!("/api/documents/{document_id}/upload"),
        &org.client.access_token,
    )
    .multipart(pdf_part())
    .send()
    .await
    .unwrap();

    let resp = app
        .auth_post(
            &format!("/api/documents/{document_id}/review"),
            &org.staff.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 502);
}
