use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn stats_count_only_the_callers_tenant() {
    let app = TestApp::spawn().await;
    let acme = app.seed_org("acme").await;
    let beta = app.seed_org("beta").await;

    app.seed_case(&acme, "First").await;
    app.seed_case(&acme, "Second").await;
    app.seed_case(&beta, "Foreign").await;

    let resp = app
        .auth_get("/api/stats", &acme.admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["cases_total"], 2);
    assert_eq!(json["cases_open"], 2);
    assert_eq!(json["messages_total"], 0);
    assert!(json["notifications_unread"].is_number());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn dashboard_breaks_cases_down_by_status() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;

    app.seed_case(&org, "Intake case").await;
    let filed = app.seed_case(&org, "Filed case").await;
    let filed_id = filed["id"].as_str().unwrap();
    app.auth_patch(
        &format!("/api/cases/{filed_id}/stages/filed"),
        &org.staff.access_token,
    )
    .send()
    .await
    .unwrap();

    let resp = app
        .auth_get("/api/analytics/dashboard", &org.staff.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["cases_by_status"]["intake"], 1);
    assert_eq!(json["cases_by_status"]["filed"], 1);
    assert_eq!(json["cases_by_status"]["closed"], 0);

    // Case creation left audit rows behind.
    let recent = json["recent_activity"].as_array().unwrap();
    assert!(recent.iter().any(|e| e["action"] == "case_created"));
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn typed_case_report_returns_a_status_breakdown() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    app.seed_case(&org, "Asylum case").await;

    let resp = app
        .auth_get("/api/analytics/reports?type=cases", &org.admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["report_type"], "cases");
    assert_eq!(json["breakdown"]["intake"], 1);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn date_range_excludes_rows_outside_the_window() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;
    app.seed_case(&org, "Asylum case").await;

    let resp = app
        .auth_get(
            "/api/analytics/reports?type=cases&to=2020-01-01T00:00:00Z",
            &org.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["breakdown"]["intake"], 0);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn unknown_report_type_is_a_400() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;

    let resp = app
        .auth_get("/api/analytics/reports?type=bogus", &org.admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn clients_get_no_analytics() {
    let app = TestApp::spawn().await;
    let org = app.seed_org("acme").await;

    for path in [
        "/api/stats",
        "/api/analytics/dashboard",
        "/api/analytics/reports?type=cases",
    ] {
        let resp = app
            .auth_get(path, &org.client.access_token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 403, "expected 403 for {path}");
    }
}
