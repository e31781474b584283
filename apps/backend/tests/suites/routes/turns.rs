use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;
use time::Duration;

use crate::support::app::{call_json, get, post, started_game, TestWorld};

#[tokio::test]
async fn stroke_guess_and_win() {
    let world = TestWorld::new().await;
    let app = world.app().await;
    let (game_id, drawer) = started_game(&world, &app, "alice", &["bob", "carol"]).await;
    let guesser = if drawer == "bob" { "carol" } else { "bob" };

    let started = call_json(&app, post(&format!("/api/games/{game_id}/turns"), &drawer), 201).await;
    let turn_id = started["turn"]["id"].as_i64().unwrap();
    let word = started["card"]["word"].as_str().unwrap().to_string();

    let turn = call_json(&app, post(&format!("/api/turns/{turn_id}/stroke"), &drawer), 200).await;
    assert!(turn["started_at"].is_string());

    world.clock.advance(Duration::seconds(8));
    let miss = call_json(
        &app,
        post(&format!("/api/turns/{turn_id}/guesses"), guesser).set_json(json!({"guess": "cane"})),
        200,
    )
    .await;
    assert_eq!(miss["result"], "rejected");

    let hit = call_json(
        &app,
        post(&format!("/api/turns/{turn_id}/guesses"), guesser).set_json(json!({ "guess": word })),
        200,
    )
    .await;
    assert_eq!(hit["result"], "won");
    assert_eq!(hit["points"], 72);
    assert_eq!(hit["drawer_points"], 18);
    assert_eq!(hit["fuzzy"], false);

    let feed = call_json(&app, get(&format!("/api/turns/{turn_id}/guesses"), "alice"), 200).await;
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["is_correct"], false);
    assert_eq!(feed[1]["is_correct"], true);

    let view = call_json(&app, get(&format!("/api/games/{game_id}/turn"), guesser), 200).await;
    assert_eq!(view["status"], "completed");
    assert_eq!(view["winner_id"], guesser);
    assert_eq!(view["word"], word.as_str());
}

#[tokio::test]
async fn time_up_with_snapshot() {
    let world = TestWorld::new().await;
    let app = world.app().await;
    let (game_id, drawer) = started_game(&world, &app, "alice", &["bob"]).await;
    let other = if drawer == "alice" { "bob" } else { "alice" };

    let started = call_json(&app, post(&format!("/api/games/{game_id}/turns"), &drawer), 201).await;
    let turn_id = started["turn"]["id"].as_i64().unwrap();
    call_json(&app, post(&format!("/api/turns/{turn_id}/stroke"), &drawer), 200).await;

    let resp = test::call_service(
        &app,
        post(&format!("/api/turns/{turn_id}/time-up"), other).to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "DEADLINE_NOT_REACHED",
        StatusCode::CONFLICT,
        Some("seconds left"),
    )
    .await;

    world.clock.advance(Duration::seconds(80));
    let turn = call_json(
        &app,
        post(&format!("/api/turns/{turn_id}/time-up"), &drawer)
            .set_json(json!({"drawing": "iVBORw0KGgo="})),
        200,
    )
    .await;
    assert_eq!(turn["status"], "time_up");
    assert_eq!(turn["points_awarded"], 0);
    let blob_ref = turn["drawing_ref"].as_str().unwrap();
    assert_eq!(&world.blobs.get(blob_ref).unwrap()[..4], b"\x89PNG");

    // A second timeout loses and leaves no extra blob behind.
    let resp = test::call_service(
        &app,
        post(&format!("/api/turns/{turn_id}/time-up"), other)
            .set_json(json!({"drawing": "iVBORw0KGgo="}))
            .to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "TURN_ALREADY_FINALIZING",
        StatusCode::CONFLICT,
        None,
    )
    .await;
    assert_eq!(world.blobs.len(), 1);
}

#[tokio::test]
async fn drawer_picks_the_winner() {
    let world = TestWorld::new().await;
    let app = world.app().await;
    let (game_id, drawer) = started_game(&world, &app, "alice", &["bob"]).await;
    let other = if drawer == "alice" { "bob" } else { "alice" };

    let started = call_json(&app, post(&format!("/api/games/{game_id}/turns"), &drawer), 201).await;
    let turn_id = started["turn"]["id"].as_i64().unwrap();
    call_json(&app, post(&format!("/api/turns/{turn_id}/stroke"), &drawer), 200).await;

    let turn = call_json(
        &app,
        post(&format!("/api/turns/{turn_id}/winner"), &drawer)
            .set_json(json!({"winner_id": other, "time_remaining_seconds": 44})),
        200,
    )
    .await;
    assert_eq!(turn["status"], "completed");
    assert_eq!(turn["winner_id"], other);
    assert_eq!(turn["points_awarded"], 44);
    assert_eq!(turn["drawer_points_awarded"], 11);
}

#[tokio::test]
async fn refused_finalizers_never_store_their_snapshot() {
    let world = TestWorld::new().await;
    let app = world.app().await;
    let (game_id, drawer) = started_game(&world, &app, "alice", &["bob"]).await;
    let other = if drawer == "alice" { "bob" } else { "alice" };

    let started = call_json(&app, post(&format!("/api/games/{game_id}/turns"), &drawer), 201).await;
    let turn_id = started["turn"]["id"].as_i64().unwrap();
    call_json(&app, post(&format!("/api/turns/{turn_id}/stroke"), &drawer), 200).await;

    let resp = test::call_service(
        &app,
        post(&format!("/api/turns/{turn_id}/winner"), other)
            .set_json(json!({
                "winner_id": drawer,
                "time_remaining_seconds": 30,
                "drawing": "iVBORw0KGgo=",
            }))
            .to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "NOT_CURRENT_DRAWER",
        StatusCode::FORBIDDEN,
        None,
    )
    .await;

    world.clock.advance(Duration::seconds(80));
    let resp = test::call_service(
        &app,
        post(&format!("/api/turns/{turn_id}/time-up"), "mallory")
            .set_json(json!({"drawing": "iVBORw0KGgo="}))
            .to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "NOT_A_MEMBER",
        StatusCode::FORBIDDEN,
        None,
    )
    .await;
    assert_eq!(world.blobs.writes(), 0);

    let turn = call_json(
        &app,
        post(&format!("/api/turns/{turn_id}/time-up"), other)
            .set_json(json!({"drawing": "iVBORw0KGgo="})),
        200,
    )
    .await;
    assert_eq!(turn["status"], "time_up");
    assert_eq!(world.blobs.writes(), 1);
}

#[tokio::test]
async fn drawing_upload_is_reserved_to_the_drawer() {
    let world = TestWorld::new().await;
    let app = world.app().await;
    let (game_id, drawer) = started_game(&world, &app, "alice", &["bob"]).await;
    let other = if drawer == "alice" { "bob" } else { "alice" };

    let started = call_json(&app, post(&format!("/api/games/{game_id}/turns"), &drawer), 201).await;
    let turn_id = started["turn"]["id"].as_i64().unwrap();
    let uri = format!("/api/turns/{turn_id}/drawing");

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(("x-user-id", other))
            .set_payload(&b"\x89PNG not yours"[..])
            .to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "NOT_CURRENT_DRAWER",
        StatusCode::FORBIDDEN,
        None,
    )
    .await;
    assert_eq!(world.blobs.writes(), 0);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(("x-user-id", drawer.as_str()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = call_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(("x-user-id", drawer.as_str()))
            .set_payload(&b"\x89PNG first"[..]),
        200,
    )
    .await;
    let first_url = body["drawing_url"].as_str().unwrap().to_string();
    assert!(first_url.starts_with("memory://"));

    let body = call_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(("x-user-id", drawer.as_str()))
            .set_payload(&b"\x89PNG second"[..]),
        200,
    )
    .await;
    assert_eq!(body["turn_id"], turn_id);
    assert_ne!(body["drawing_url"], first_url.as_str());

    // The replaced snapshot is cleaned up in the background.
    for _ in 0..200 {
        if world.blobs.len() == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(world.blobs.len(), 1);
}

#[tokio::test]
async fn second_turn_while_drawing_conflicts() {
    let world = TestWorld::new().await;
    let app = world.app().await;
    let (game_id, drawer) = started_game(&world, &app, "alice", &["bob"]).await;

    call_json(&app, post(&format!("/api/games/{game_id}/turns"), &drawer), 201).await;
    let resp = test::call_service(
        &app,
        post(&format!("/api/games/{game_id}/turns"), &drawer).to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "TURN_IN_PROGRESS",
        StatusCode::CONFLICT,
        None,
    )
    .await;
}
