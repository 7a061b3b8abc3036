use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn case_creation_notifies_the_client() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    app.seed_case(&org, "Asylum case").await;

    let resp = app
        .auth_get("/api/notifications", &org.client.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "New case opened");
    assert_eq!(items[0]["is_read"], false);
    assert_eq!(json["unread"], 1);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn mark_read_and_read_all() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    app.seed_case(&org, "First").await;
    app.seed_case(&org, "Second").await;

    let resp = app
        .auth_get("/api/notifications", &org.client.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let first_id = json["items"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(json["unread"], 2);

    let resp = app
        .auth_post(
            &format!("/api/notifications/{first_id}/read"),
            &org.client.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_post("/api/notifications/read-all", &org.client.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["updated"], 1);

    let resp = app
        .auth_get("/api/notifications?unread_only=true", &org.client.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn users_never_see_each_others_notifications() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    app.seed_case(&org, "Asylum case").await;

    // The client got the notification; another user cannot mark it read.
    let resp = app
        .auth_get("/api/notifications", &org.client.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let id = json["items"][0]["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_post(&format!("/api/notifications/{id}/read"), &org.admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
