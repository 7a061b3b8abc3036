pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me));

    let case_routes = Router::new()
        .route("/", get(routes::case::list))
        .route("/", post(routes::case::create))
        .route("/{case_id}", get(routes::case::get))
        .route("/{case_id}", patch(routes::case::update))
        .route("/{case_id}/stages/{stage}", patch(routes::case::set_stage))
        .route("/{case_id}/reminders", get(routes::case::reminders));

    let document_routes = Router::new()
        .route("/", get(routes::document::list))
        .route("/request", post(routes::document::request))
        .route("/payload/{*storage_key}", get(routes::document::payload))
        .route("/{document_id}", get(routes::document::get))
        .route("/{document_id}", patch(routes::document::update))
        .route("/{document_id}", delete(routes::document::delete))
        .route("/{document_id}/upload", post(routes::document::upload))
        .route("/{document_id}/review", post(routes::document::review));

    let message_routes = Router::new()
        .route("/", get(routes::message::list))
        .route("/", post(routes::message::create))
        .route("/{message_id}", patch(routes::message::mark_read));

    let notification_routes = Router::new()
        .route("/", get(routes::notification::list))
        .route("/{notification_id}/read", post(routes::notification::mark_read))
        .route("/read-all", post(routes::notification::mark_all_read));

    let analytics_routes = Router::new()
        .route("/dashboard", get(routes::analytics::dashboard))
        .route("/reports", get(routes::analytics::reports));

    let user_routes = Router::new()
        .route("/", get(routes::user::list))
        .route("/", post(routes::user::create));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/cases", case_routes)
        .nest("/documents", document_routes)
        .nest("/messages", message_routes)
        .nest("/notifications", notification_routes)
        .nest("/analytics", analytics_routes)
        .route("/stats", get(routes::analytics::stats));

    let cron = Router::new()
        .route("/demo-clean", post(routes::cron::demo_clean))
        .route("/reminders", post(routes::cron::reminders));

    let superadmin = Router::new()
        .route("/login", post(routes::superadmin::login))
        .route("/organizations", get(routes::superadmin::list_organizations))
        .route("/organizations", post(routes::superadmin::create_organization))
        .route(
            "/organizations/{organization_id}/deactivate",
            post(routes::superadmin::deactivate_organization),
        )
        .route(
            "/organizations/{organization_id}/activate",
            post(routes::superadmin::activate_organization),
        );

    Router::new()
        .nest("/api", api)
        .nest("/cron", cron)
        .nest("/superadmin", superadmin)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
