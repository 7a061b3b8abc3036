use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn client_and_staff_exchange_case_messages() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    let case = app.seed_case(&org, "Asylum case").await;
    let case_id = case["id"].as_str().unwrap();

    let resp = app
        .auth_post("/api/messages", &org.client.access_token)
        .json(&serde_json::json!({
            "case_id": case_id,
            "receiver_id": org.staff.id,
            "content": "I uploaded my passport scan.",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_post("/api/messages", &org.staff.access_token)
        .json(&serde_json::json!({
            "case_id": case_id,
            "receiver_id": org.client.id,
            "content": "Received, thank you.",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_get(
            &format!("/api/messages?case_id={case_id}"),
            &org.client.access_token,
        )
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn only_the_receiver_can_flip_the_read_flag() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    let case = app.seed_case(&org, "Asylum case").await;
    let case_id = case["id"].as_str().unwrap();

    let resp = app
        .auth_post("/api/messages", &org.staff.access_token)
        .json(&serde_json::json!({
            "case_id": case_id,
            "receiver_id": org.client.id,
            "content": "Please confirm your address.",
        }))
        .send()
        .await
        .unwrap();
    let message: Value = resp.json().await.unwrap();
    let message_id = message["id"].as_str().unwrap();

    // The sender cannot mark it read; the row looks nonexistent to them.
    let resp = app
        .auth_patch(&format!("/api/messages/{message_id}"), &org.staff.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .auth_patch(&format!("/api/messages/{message_id}"), &org.client.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/messages?case_id={case_id}"),
            &org.client.access_token,
        )
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["items"][0]["is_read"], true);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn message_creation_is_rate_limited() {
    let app = TestApp::spawn_with_settings(|settings| {
        settings.limits.message_creates = 2;
        settings.limits.message_window_secs = 300;
    })
    .await;
    let org = app.seed_org("acme").await;
    let case = app.seed_case(&org, "Asylum case").await;
    let case_id = case["id"].as_str().unwrap();

    for _ in 0..2 {
        let resp = app
            .auth_post("/api/messages", &org.client.access_token)
            .json(&serde_json::json!({
                "case_id": case_id,
                "receiver_id": org.staff.id,
                "content": "ping",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
    }

    let resp = app
        .auth_post("/api/messages", &org.client.access_token)
        .json(&serde_json::json!({
            "case_id": case_id,
            "receiver_id": org.staff.id,
            "content": "ping",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 429);

    // The rejected call has no side effects.
    let resp = app
        .auth_get(
            &format!("/api/messages?case_id={case_id}"),
            &org.staff.access_token,
        )
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn client_cannot_message_on_a_foreign_case() {
    let app = TestApp::spawn().await;
    let acme = app.seed_org("acme").await;
    let beta = app.seed_org("beta").await;
    let case = app.seed_case(&acme, "Acme case").await;
    let case_id = case["id"].as_str().unwrap();

    let resp = app
        .auth_post("/api/messages", &beta.client.access_token)
        .json(&serde_json::json!({
            "case_id": case_id,
            "receiver_id": beta.staff.id,
            "content": "hello?",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
