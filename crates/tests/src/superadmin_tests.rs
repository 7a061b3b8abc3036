use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn console_login_rejects_bad_credentials() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/superadmin/login"))
        .json(&serde_json::json!({
            "email": app.settings.superadmin.email,
            "password": "not-the-password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn tenant_tokens_do_not_open_the_console() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;

    let resp = app
        .auth_get("/superadmin/organizations", &org.admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn created_organizations_are_listed() {
    let app = TestApp::spawn().await;
    app.seed_org("acme").await;
    app.seed_org("beta").await;
    let superadmin = app.superadmin_token().await;

    let resp = app
        .auth_get("/superadmin/organizations", &superadmin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let slugs: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|org| org["slug"].as_str().unwrap())
        .collect();
    assert!(slugs.contains(&"acme"));
    assert!(slugs.contains(&"beta"));
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn deactivation_locks_the_tenant_out_until_reactivated() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    let superadmin = app.superadmin_token().await;

    let resp = app
        .auth_post(
            &format!("/superadmin/organizations/{}/deactivate", org.organization_id),
            &superadmin,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Fresh logins are refused.
    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": org.admin.email,
            "password": "Admin123!pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    // Tokens issued before the toggle stop working too.
    let resp = app
        .auth_get("/api/cases", &org.staff.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_post(
            &format!("/superadmin/organizations/{}/activate", org.organization_id),
            &superadmin,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get("/api/cases", &org.staff.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn toggling_an_unknown_organization_is_a_404() {
    let app = TestApp::spawn().await;
    let superadmin = app.superadmin_token().await;

    let resp = app
        .auth_post(
            &format!(
                "/superadmin/organizations/{}/deactivate",
                bson::oid::ObjectId::new().to_hex()
            ),
            &superadmin,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn duplicate_slug_is_a_conflict() {
    let app = TestApp::spawn().await;
    app.seed_org("acme").await;
    let superadmin = app.superadmin_token().await;

    let resp = app
        .auth_post("/superadmin/organizations", &superadmin)
        .json(&serde_json::json!({
            "name": "Acme Again",
            "slug": "acme",
            "admin_email": "admin2@acme.test",
            "admin_full_name": "Second Admin",
            "admin_password": "Admin123!pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}
