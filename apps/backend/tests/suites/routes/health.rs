use actix_web::test;

use crate::support::app::TestWorld;

#[tokio::test]
async fn health_reports_database_and_migrations() {
    let world = TestWorld::new().await;
    let app = world.app().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    let body = crate::common::json_body(resp, 200).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body.get("db_error").is_none());
    assert!(body["migrations"].as_str().is_some_and(|v| v.starts_with('m')));
    assert!(body["app_version"].is_string());
    assert!(body["time"].is_string());
}
