use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use backend_test_support::unique_helpers::unique_user_id;

use crate::support::app::{get, post, started_game, TestWorld};

#[tokio::test]
async fn members_follow_changes_until_the_game_is_deleted() {
    let world = TestWorld::new().await;
    let app = world.app().await;
    let (game_id, drawer) = started_game(&world, &app, "alice", &["bob"]).await;

    let stream = test::call_service(
        &app,
        get(&format!("/api/games/{game_id}/events"), "bob").to_request(),
    )
    .await;
    assert_eq!(stream.status(), StatusCode::OK);
    assert_eq!(
        stream.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );

    let resp = test::call_service(
        &app,
        post(&format!("/api/games/{game_id}/turns"), &drawer).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = test::call_service(
        &app,
        post(&format!("/api/games/{game_id}/leave"), "alice").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(stream).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with(": connected\n\n"));
    let started = text.find("event: turn_started").expect("turn_started frame");
    let deleted = text.find("event: game_deleted").expect("game_deleted frame");
    assert!(started < deleted);
    assert!(text.ends_with("\n\n"));
}

#[tokio::test]
async fn outsiders_cannot_subscribe() {
    let world = TestWorld::new().await;
    let app = world.app().await;
    let (game_id, _) = started_game(&world, &app, "alice", &["bob"]).await;
    let outsider = unique_user_id("mallory");

    let resp = test::call_service(
        &app,
        get(&format!("/api/games/{game_id}/events"), &outsider).to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "NOT_A_MEMBER",
        StatusCode::FORBIDDEN,
        None,
    )
    .await;
}
