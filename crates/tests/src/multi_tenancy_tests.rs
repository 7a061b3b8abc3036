use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn org_isolation_end_to_end() {
    let app = TestApp::spawn().await;
    let acme = app.seed_org("acme").await;
    let beta = app.seed_org("beta").await;

    let case = app.seed_case(&acme, "I-589 filing").await;
    let case_id = case["id"].as_str().unwrap();

    // The acme client sees their case.
    let resp = app
        .auth_get("/api/cases", &acme.client.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["items"].as_array().unwrap().len(), 1);

    // The beta client sees an empty list, not an error.
    let resp = app
        .auth_get("/api/cases", &beta.client.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["items"].as_array().unwrap().len(), 0);

    // A valid foreign id is a 404, never a 403: existence does not leak.
    let resp = app
        .auth_get(&format!("/api/cases/{case_id}"), &beta.admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn client_cannot_reach_another_clients_case_in_same_org() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;

    // A second client in the same organization.
    let resp = app
        .auth_post("/api/users", &org.admin.access_token)
        .json(&serde_json::json!({
            "email": "other@acme.test",
            "full_name": "Other Client",
            "role": "client",
            "password": "Other123!pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let other = app.login_user("other@acme.test", "Other123!pass").await;

    let case = app.seed_case(&org, "Work visa renewal").await;
    let case_id = case["id"].as_str().unwrap();

    // Staff sees it; the unrelated client gets a 404.
    let resp = app
        .auth_get(&format!("/api/cases/{case_id}"), &org.staff.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(&format!("/api/cases/{case_id}"), &other.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn client_role_cannot_create_cases() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;

    let resp = app
        .auth_post("/api/cases", &org.client.access_token)
        .json(&serde_json::json!({
            "title": "Self-service case",
            "case_type": "asylum",
            "client_id": org.client.id,
            "assigned_staff_id": org.staff.id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
