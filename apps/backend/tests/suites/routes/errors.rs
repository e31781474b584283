use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;

use crate::support::app::{get, post, TestWorld};

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let world = TestWorld::new().await;
    let app = world.app().await;

    let req = test::TestRequest::post()
        .uri("/api/games")
        .set_json(json!({"category": "Cibo", "max_rounds": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "UNAUTHORIZED",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;
}

#[tokio::test]
async fn malformed_identity_header_is_rejected() {
    let world = TestWorld::new().await;
    let app = world.app().await;

    let resp = test::call_service(&app, get("/api/games/1", &"x".repeat(65)).to_request()).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_HEADER",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
}

#[tokio::test]
async fn bad_path_ids_are_rejected_before_lookup() {
    let world = TestWorld::new().await;
    let app = world.app().await;

    for path in ["/api/games/abc", "/api/games/0", "/api/games/-4"] {
        let resp = test::call_service(&app, get(path, "alice").to_request()).await;
        assert_problem_details_from_service_response(
            resp,
            "INVALID_GAME_ID",
            StatusCode::BAD_REQUEST,
            None,
        )
        .await;
    }

    let resp = test::call_service(&app, get("/api/turns/x/guesses", "alice").to_request()).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_TURN_ID",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let world = TestWorld::new().await;
    let app = world.app().await;

    let resp = test::call_service(&app, get("/api/games/424242", "alice").to_request()).await;
    assert_problem_details_from_service_response(
        resp,
        "GAME_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("424242"),
    )
    .await;

    let resp = test::call_service(
        &app,
        post("/api/turns/99/guesses", "alice")
            .set_json(json!({"guess": "gatto"}))
            .to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "TURN_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
}

#[tokio::test]
async fn body_errors_are_problem_details() {
    let world = TestWorld::new().await;
    let app = world.app().await;

    let resp = test::call_service(
        &app,
        post("/api/games", "alice")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"category": "Cibo", "max_rounds": }"#)
            .to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("Invalid JSON"),
    )
    .await;

    let resp = test::call_service(
        &app,
        post("/api/games", "alice")
            .set_json(json!({"category": "Cibo", "max_rounds": 0}))
            .to_request(),
    )
    .await;
    let problem = assert_problem_details_from_service_response(
        resp,
        "INVALID_MAX_ROUNDS",
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
    )
    .await;
    assert_eq!(problem.title, "Invalid Max Rounds");
    assert!(problem.type_.ends_with("/INVALID_MAX_ROUNDS"));
}

#[tokio::test]
async fn empty_pool_is_a_retryable_503() {
    let world = TestWorld::new().await;
    let app = world.app().await;
    let (game_id, drawer) =
        crate::support::app::started_game(&world, &app, "alice", &["bob"]).await;

    // Burn through every card the game has.
    let db = world.state.db().unwrap();
    while drawguess::repos::cards::count_unused(db, game_id).await.unwrap() > 0 {
        let card = drawguess::repos::cards::find_next_unused(db, game_id)
            .await
            .unwrap()
            .unwrap();
        assert!(drawguess::repos::cards::claim_card(db, card.id).await.unwrap());
    }

    let resp = test::call_service(
        &app,
        post(&format!("/api/games/{game_id}/turns"), &drawer).to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "NO_CARDS_AVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE,
        Some("retry"),
    )
    .await;
}
