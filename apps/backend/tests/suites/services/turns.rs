use std::collections::HashSet;

use drawguess::entities::games::GameStatus;
use drawguess::entities::turns::TurnStatus;
use drawguess::repos::cards;
use drawguess::ErrorCode;

use crate::support::harness::Harness;

fn others<'a>(users: &[&'a str], drawer: &str) -> Vec<&'a str> {
    users.iter().copied().filter(|u| *u != drawer).collect()
}

#[tokio::test]
async fn only_the_current_drawer_starts_a_turn() {
    let h = Harness::new().await;
    let users = ["a", "b", "c"];
    let game = h.started_game(&users, 2).await;
    let drawer = game.current_drawer_id.clone().unwrap();

    let bystander = others(&users, &drawer)[0];
    let err = h.start_turn(game.id, bystander).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotCurrentDrawer);
    assert_eq!(err.status().as_u16(), 403);

    let err = h.start_turn(game.id, "mallory").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAMember);

    let started = h.start_turn(game.id, &drawer).await.unwrap();
    assert_eq!(started.turn.status, TurnStatus::Drawing);
    assert_eq!(started.turn.started_at, None);
    assert_eq!(started.turn.round, 0);
    assert_eq!(started.turn.time_limit, 80);
    assert!(started.card.is_used);

    let game = h.game(game.id).await;
    assert_eq!(game.current_card_id, Some(started.card.id));
}

#[tokio::test]
async fn second_turn_waits_for_the_first() {
    let h = Harness::new().await;
    let game = h.started_game(&["a", "b"], 2).await;
    let drawer = game.current_drawer_id.clone().unwrap();

    h.start_turn(game.id, &drawer).await.unwrap();
    let err = h.start_turn(game.id, &drawer).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::TurnInProgress);
}

#[tokio::test]
async fn turns_need_a_started_game() {
    let h = Harness::new().await;
    let created = h.create_game("a", 2).await;
    h.join(&created.code, "b").await.unwrap();

    let err = h.start_turn(created.game_id, "a").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PhaseMismatch);
}

#[tokio::test]
async fn first_stroke_starts_the_clock_once() {
    let h = Harness::new().await;
    let game = h.started_game(&["a", "b"], 2).await;
    let drawer = game.current_drawer_id.clone().unwrap();
    let started = h.start_turn(game.id, &drawer).await.unwrap();
    let turn_id = started.turn.id;
    h.events.clear();

    let first = h.stroke(turn_id, &drawer).await.unwrap();
    let stamped = first.started_at.unwrap();
    assert_eq!(stamped, h.clock_now());

    h.advance(5);
    let second = h.stroke(turn_id, &drawer).await.unwrap();
    assert_eq!(second.started_at, Some(stamped));
    assert_eq!(h.events.names(), vec!["timer_started"]);
}

#[tokio::test]
async fn only_the_turn_drawer_can_stroke() {
    let h = Harness::new().await;
    let users = ["a", "b"];
    let game = h.started_game(&users, 2).await;
    let drawer = game.current_drawer_id.clone().unwrap();
    let started = h.start_turn(game.id, &drawer).await.unwrap();

    let err = h
        .stroke(started.turn.id, others(&users, &drawer)[0])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotCurrentDrawer);
}

#[tokio::test]
async fn time_up_waits_for_the_server_deadline() {
    let h = Harness::new().await;
    let users = ["a", "b", "c"];
    let game = h.started_game(&users, 2).await;
    let drawer = game.current_drawer_id.clone().unwrap();
    let started = h.start_turn(game.id, &drawer).await.unwrap();
    let turn_id = started.turn.id;
    let guesser = others(&users, &drawer)[0];

    let err = h.time_up(turn_id, guesser).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::TimerNotStarted);

    h.stroke(turn_id, &drawer).await.unwrap();
    h.advance(79);
    let err = h.time_up(turn_id, guesser).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DeadlineNotReached);

    let err = h.time_up(turn_id, "mallory").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAMember);

    h.advance(1);
    let turn = h.time_up(turn_id, guesser).await.unwrap();
    assert_eq!(turn.status, TurnStatus::TimeUp);
    assert_eq!(turn.winner_id, None);
    assert_eq!(turn.points_awarded, 0);
    assert_eq!(turn.drawer_points_awarded, 0);
    assert!(turn.completed_at.is_some());

    for player in h.players(game.id).await {
        assert_eq!(player.score, 0);
    }
    let game = h.game(game.id).await;
    assert_ne!(game.current_drawer_id.as_deref(), Some(drawer.as_str()));
}

#[tokio::test]
async fn selected_winner_scores_the_lesser_of_claimed_and_actual_time() {
    let h = Harness::new().await;
    let users = ["a", "b", "c"];
    let game = h.started_game(&users, 2).await;
    let started = h.drawing_turn(game.id).await;
    let drawer = started.turn.drawer_id.clone();
    let winner = others(&users, &drawer)[0];

    h.advance(60);
    let turn_id = started.turn.id;
    let turn = h
        .run({
            let drawer = drawer.clone();
            move |txn, flow| {
                Box::pin(async move {
                    flow.select_winner(txn, turn_id, &drawer, winner, 75, None)
                        .await
                })
            }
        })
        .await
        .unwrap();

    assert_eq!(turn.status, TurnStatus::Completed);
    assert_eq!(turn.winner_id.as_deref(), Some(winner));
    assert_eq!(turn.points_awarded, 20);
    assert_eq!(turn.drawer_points_awarded, 10);
    assert_eq!(h.score(game.id, winner).await, 20);
    assert_eq!(h.score(game.id, &drawer).await, 10);
}

#[tokio::test]
async fn selected_winner_must_be_another_member() {
    let h = Harness::new().await;
    let users = ["a", "b"];
    let game = h.started_game(&users, 2).await;
    let started = h.drawing_turn(game.id).await;
    let drawer = started.turn.drawer_id.clone();
    let turn_id = started.turn.id;

    for winner in [drawer.clone(), "mallory".to_string()] {
        let caller = drawer.clone();
        let err = h
            .run(move |txn, flow| {
                Box::pin(async move {
                    flow.select_winner(txn, turn_id, &caller, &winner, 40, None)
                        .await
                })
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidWinner);
    }

    let guesser = others(&users, &drawer)[0];
    let err = h
        .run(move |txn, flow| {
            Box::pin(async move {
                flow.select_winner(txn, turn_id, guesser, guesser, 40, None)
                    .await
            })
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotCurrentDrawer);
}

#[tokio::test]
async fn game_of_n_players_and_m_rounds_plays_exactly_n_times_m_turns() {
    let h = Harness::new().await;
    let users = ["a", "b"];
    let game = h.started_game(&users, 3).await;

    for _ in 0..6 {
        assert_eq!(h.game(game.id).await.status, GameStatus::Started);
        h.skip_turn(game.id).await;
    }
    assert_eq!(h.game(game.id).await.status, GameStatus::Finished);

    let turns = h.turns(game.id).await;
    assert_eq!(turns.len(), 6);
    let rounds: Vec<i32> = turns.iter().map(|t| t.round).collect();
    assert_eq!(rounds, vec![0, 0, 1, 1, 2, 2]);

    let card_ids: HashSet<i64> = turns.iter().map(|t| t.card_id).collect();
    assert_eq!(card_ids.len(), turns.len());
    for card_id in card_ids {
        assert!(cards::require_card(&h.db, card_id).await.unwrap().is_used);
    }
}

#[tokio::test]
async fn drawer_alternates_within_a_two_player_round() {
    let h = Harness::new().await;
    let game = h.started_game(&["a", "b"], 1).await;

    let first = h.skip_turn(game.id).await;
    let second = h.skip_turn(game.id).await;
    assert_ne!(first.drawer_id, second.drawer_id);
    assert_eq!(h.game(game.id).await.status, GameStatus::Finished);
}
