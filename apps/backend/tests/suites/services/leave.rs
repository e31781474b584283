use bytes::Bytes;
use drawguess::entities::games::GameStatus;
use drawguess::entities::turns::TurnStatus;
use drawguess::ErrorCode;

use crate::support::harness::Harness;

#[tokio::test]
async fn host_leaving_deletes_the_game_and_its_drawings() {
    let h = Harness::new().await;
    let game = h.started_game(&["host", "b", "c"], 2).await;
    let turn = h.skip_turn(game.id).await;

    let flow = h.flow();
    let blob_ref = flow
        .store_drawing(Bytes::from_static(b"\x89PNG fake"))
        .await
        .unwrap();
    let drawer = turn.drawer_id.clone();
    let attached = blob_ref.clone();
    h.run(move |txn, flow| {
        Box::pin(async move {
            flow.attach_drawing(txn, turn.id, &drawer, Some(&attached))
                .await
        })
    })
    .await
    .unwrap();
    assert_eq!(h.blobs.len(), 1);
    h.events.clear();

    assert!(h.leave(game.id, "host").await.unwrap());

    assert!(h.find_game(game.id).await.is_none());
    assert!(h.players(game.id).await.is_empty());
    assert!(h.turns(game.id).await.is_empty());
    assert_eq!(h.unused_cards(game.id).await, 0);
    assert!(h.blobs.get(&blob_ref).is_none());
    assert_eq!(h.events.names(), vec!["game_deleted"]);

    let err = h.leave(game.id, "b").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);
}

#[tokio::test]
async fn guest_leaving_a_lobby_only_removes_them() {
    let h = Harness::new().await;
    let created = h.create_game("host", 2).await;
    h.join(&created.code, "b").await.unwrap();
    h.join(&created.code, "c").await.unwrap();

    assert!(!h.leave(created.game_id, "b").await.unwrap());

    let ids: Vec<String> = h
        .players(created.game_id)
        .await
        .into_iter()
        .map(|p| p.player_id)
        .collect();
    assert_eq!(ids, vec!["host".to_string(), "c".into()]);
    assert_eq!(h.game(created.game_id).await.status, GameStatus::Waiting);

    let err = h.leave(created.game_id, "b").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAMember);
}

#[tokio::test]
async fn departing_drawer_hands_the_pen_to_their_successor() {
    let h = Harness::new().await;
    let users = ["host", "b", "c"];
    let game = h.started_game(&users, 3).await;

    // Rotate until a guest holds the pen.
    while h.game(game.id).await.current_drawer_id.as_deref() == Some("host") {
        h.skip_turn(game.id).await;
    }
    let before = h.game(game.id).await;
    let drawer = before.current_drawer_id.clone().unwrap();
    let started = h.drawing_turn(game.id).await;
    assert_eq!(started.turn.drawer_id, drawer);
    h.events.clear();

    assert!(!h.leave(game.id, &drawer).await.unwrap());

    let turn = h.turn(started.turn.id).await;
    assert_eq!(turn.status, TurnStatus::TimeUp);
    assert_eq!(turn.points_awarded, 0);
    assert_eq!(turn.drawer_points_awarded, 0);

    let after = h.game(game.id).await;
    assert_eq!(after.status, GameStatus::Started);
    assert_ne!(after.current_drawer_id.as_deref(), Some(drawer.as_str()));
    if after.round == before.round {
        let idx = users.iter().position(|u| *u == drawer).unwrap();
        let successor = users[(idx + 1) % users.len()];
        assert_eq!(after.current_drawer_id.as_deref(), Some(successor));
    }

    let names = h.events.names();
    assert!(names.contains(&"players_changed"));
    assert!(names.contains(&"turn_ended"));
}

#[tokio::test]
async fn past_drawer_leaving_mid_round_does_not_skip_anyone() {
    let h = Harness::new().await;
    let game = h.started_game(&["host", "b", "c", "d"], 2).await;

    let first = h.skip_turn(game.id).await;
    let second = h.skip_turn(game.id).await;
    let leaver = [&first.drawer_id, &second.drawer_id]
        .into_iter()
        .find(|id| id.as_str() != "host")
        .cloned()
        .unwrap();
    let drawer_before = h.game(game.id).await.current_drawer_id;

    assert!(!h.leave(game.id, &leaver).await.unwrap());
    assert_eq!(h.game(game.id).await.current_drawer_id, drawer_before);

    while h.game(game.id).await.round == 0 {
        h.skip_turn(game.id).await;
    }

    let round_zero: Vec<String> = h
        .turns(game.id)
        .await
        .into_iter()
        .filter(|t| t.round == 0)
        .map(|t| t.drawer_id)
        .collect();
    assert_eq!(round_zero.len(), 4, "round 0 drawers: {round_zero:?}");
    for player in h.players(game.id).await {
        assert_eq!(
            round_zero.iter().filter(|d| **d == player.player_id).count(),
            1,
            "{} should draw exactly once in round 0: {round_zero:?}",
            player.player_id
        );
    }
    assert_eq!(h.game(game.id).await.status, GameStatus::Started);
}

#[tokio::test]
async fn game_ends_when_too_few_players_remain() {
    let h = Harness::new().await;
    let game = h.started_game(&["host", "b"], 3).await;
    let started = h.drawing_turn(game.id).await;

    assert!(!h.leave(game.id, "b").await.unwrap());

    let after = h.game(game.id).await;
    assert_eq!(after.status, GameStatus::Finished);
    assert_eq!(after.current_drawer_id, None);
    assert_eq!(h.turn(started.turn.id).await.status, TurnStatus::TimeUp);
    assert_eq!(h.players(game.id).await.len(), 1);
}
