use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn unauthenticated_request_gets_401() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/api/cases")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn login_with_wrong_password_rejected() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": org.admin.email,
            "password": "not-the-password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    // Unknown email is indistinguishable from a wrong password.
    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "ghost@acme.test",
            "password": "whatever-pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn login_is_rate_limited() {
    let app = TestApp::spawn_with_settings(|settings| {
        settings.limits.login_attempts = 3;
        settings.limits.login_window_secs = 300;
    })
    .await;

    for _ in 0..3 {
        let resp = app
            .client
            .post(app.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": "burst@test.test",
                "password": "wrong-password",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 401);
    }

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "burst@test.test",
            "password": "wrong-password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 429);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn refresh_issues_a_new_pair() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;

    let resp = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&serde_json::json!({ "refresh_token": org.admin.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let new_access = json["access_token"].as_str().unwrap();

    let resp = app.auth_get("/api/auth/me", new_access).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // An access token is not accepted as a refresh token.
    let resp = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&serde_json::json!({ "refresh_token": org.admin.access_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn me_returns_the_principal_profile() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;

    let resp = app
        .auth_get("/api/auth/me", &org.client.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["email"], org.client.email.as_str());
    assert_eq!(json["role"], "client");
    assert_eq!(json["organization_id"], org.organization_id.as_str());
}
