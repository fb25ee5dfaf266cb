mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use shortcode::api::handlers::health_handler;

#[tokio::test]
async fn test_health_endpoint_success() {
    let ctx = common::create_test_state();
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(ctx.state.clone());

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_closed_click_queue() {
    let ctx = common::create_test_state();
    drop(ctx.clicks);

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(ctx.state.clone());

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["click_queue"]["status"], "error");
}
