use drawguess::entities::games::GameStatus;
use drawguess::ErrorCode;

use crate::support::harness::Harness;

#[tokio::test]
async fn create_game_seats_host_and_fills_card_pool() {
    let h = Harness::new().await;
    let created = h.create_game("alice", 3).await;

    let game = h.game(created.game_id).await;
    assert_eq!(game.status, GameStatus::Waiting);
    assert_eq!(game.join_code, created.code);
    assert_eq!(game.max_rounds, 3);
    assert_eq!(game.current_drawer_id, None);

    let players = h.players(created.game_id).await;
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].player_id, "alice");
    assert!(players[0].is_host);
    assert_eq!(players[0].score, 0);

    assert_eq!(h.unused_cards(created.game_id).await, 8);
    assert_eq!(h.generator.calls(), 1);
    assert_eq!(
        h.events.names(),
        vec!["game_updated", "cards_replenished"]
    );
}

#[tokio::test]
async fn create_game_validates_rounds_and_category() {
    let h = Harness::new().await;

    for rounds in [0, 11, -1] {
        let err = h
            .run(move |txn, flow| {
                Box::pin(async move { flow.create_game(txn, "alice", "alice", "Cibo", rounds).await })
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMaxRounds, "rounds = {rounds}");
    }

    let err = h
        .run(|txn, flow| {
            Box::pin(async move { flow.create_game(txn, "alice", "alice", "   ", 3).await })
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidCategory);
    assert_eq!(err.status().as_u16(), 422);
}

#[tokio::test]
async fn join_normalizes_code_and_is_idempotent() {
    let h = Harness::new().await;
    let created = h.create_game("alice", 3).await;

    let sloppy = format!("  {}  ", created.code.to_lowercase());
    let first = h.join(&sloppy, "bob").await.unwrap();
    assert_eq!(first.player_id, "bob");
    assert!(!first.is_host);

    let again = h.join(&created.code, "bob").await.unwrap();
    assert_eq!(again.player_id, "bob");
    assert_eq!(h.players(created.game_id).await.len(), 2);
}

#[tokio::test]
async fn join_rejects_bad_and_unknown_codes() {
    let h = Harness::new().await;
    let created = h.create_game("alice", 3).await;

    let err = h.join("nope!", "bob").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidJoinCode);

    let unknown = if created.code == "ZZZZZZ" { "YYYYYY" } else { "ZZZZZZ" };
    let err = h.join(unknown, "bob").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);
}

#[tokio::test]
async fn start_requires_host_and_enough_players() {
    let h = Harness::new().await;
    let created = h.create_game("alice", 3).await;

    let err = h.start(created.game_id, "alice").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotEnoughPlayers);

    h.join(&created.code, "bob").await.unwrap();
    let err = h.start(created.game_id, "bob").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotHost);

    let err = h.start(created.game_id, "mallory").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAMember);

    let game = h.start(created.game_id, "alice").await.unwrap();
    assert_eq!(game.status, GameStatus::Started);
    assert_eq!(game.round, 0);
    assert!(game.started_at.is_some());
    let drawer = game.current_drawer_id.clone().unwrap();
    assert!(drawer == "alice" || drawer == "bob");

    let err = h.start(created.game_id, "alice").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameAlreadyStarted);
}

#[tokio::test]
async fn late_join_is_refused_but_members_can_reconnect() {
    let h = Harness::new().await;
    let created = h.create_game("p1", 3).await;
    h.join(&created.code, "p2").await.unwrap();
    let game = h.start(created.game_id, "p1").await.unwrap();
    assert!(["p1", "p2"].contains(&game.current_drawer_id.as_deref().unwrap()));

    let err = h.join(&created.code, "p3").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameAlreadyStarted);
    assert_eq!(err.status().as_u16(), 409);

    let back = h.join(&created.code, "p2").await.unwrap();
    assert_eq!(back.player_id, "p2");
    assert_eq!(h.players(created.game_id).await.len(), 2);
}

#[tokio::test]
async fn first_drawer_is_drawn_from_the_roster() {
    let h = Harness::new().await;
    let users = ["a", "b", "c", "d"];
    for _ in 0..6 {
        let game = h.started_game(&users, 1).await;
        let drawer = game.current_drawer_id.unwrap();
        assert!(users.contains(&drawer.as_str()));
    }
}

#[tokio::test]
async fn game_finishes_after_every_player_draws_every_round() {
    let h = Harness::new().await;
    let users = ["a", "b", "c"];
    let game = h.started_game(&users, 2).await;

    let mut drawers_by_round: Vec<Vec<String>> = vec![Vec::new(), Vec::new()];
    for played in 0..6 {
        let current = h.game(game.id).await;
        assert_eq!(current.status, GameStatus::Started, "finished early after {played} turns");
        let turn = h.skip_turn(game.id).await;
        drawers_by_round[turn.round as usize].push(turn.drawer_id);
    }

    let finished = h.game(game.id).await;
    assert_eq!(finished.status, GameStatus::Finished);
    assert_eq!(finished.current_drawer_id, None);
    assert!(finished.finished_at.is_some());
    assert_eq!(h.turns(game.id).await.len(), 6);

    for drawers in &mut drawers_by_round {
        drawers.sort();
        assert_eq!(drawers, &vec!["a".to_string(), "b".into(), "c".into()]);
    }

    let err = h.start_turn(game.id, "a").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PhaseMismatch);
}

#[tokio::test]
async fn next_round_opens_one_seat_after_previous_opener() {
    let h = Harness::new().await;
    let game = h.started_game(&["a", "b", "c"], 3).await;
    let opener = game.current_drawer_id.clone().unwrap();

    for _ in 0..3 {
        h.skip_turn(game.id).await;
    }
    let next = h.game(game.id).await;
    assert_eq!(next.round, 1);

    let order = ["a", "b", "c"];
    let idx = order.iter().position(|p| *p == opener).unwrap();
    assert_eq!(next.current_drawer_id.as_deref(), Some(order[(idx + 1) % 3]));
}
