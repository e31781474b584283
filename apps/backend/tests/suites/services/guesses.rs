use drawguess::entities::turns::TurnStatus;
use drawguess::repos::guesses;
use drawguess::services::game_flow::GuessOutcome;
use drawguess::ErrorCode;

use crate::support::harness::Harness;

const USERS: [&str; 3] = ["a", "b", "c"];

fn guessers(drawer: &str) -> Vec<&'static str> {
    USERS.iter().copied().filter(|u| *u != drawer).collect()
}

#[tokio::test]
async fn exact_guess_wins_without_asking_the_judge() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let drawer = started.turn.drawer_id.clone();
    let guesser = guessers(&drawer)[0];

    h.advance(20);
    let shouted = format!("  {}  ", started.card.word.to_uppercase());
    let outcome = h.guess(started.turn.id, guesser, &shouted).await.unwrap();

    assert_eq!(
        outcome,
        GuessOutcome::Won {
            points: 60,
            drawer_points: 15,
            fuzzy: false
        }
    );
    assert_eq!(h.judge.calls(), 0);

    let turn = h.turn(started.turn.id).await;
    assert_eq!(turn.status, TurnStatus::Completed);
    assert_eq!(turn.winner_id.as_deref(), Some(guesser));
    assert_eq!(turn.correct_guesses, 1);
    assert_eq!(turn.points_awarded, 60);
    assert_eq!(turn.drawer_points_awarded, 15);

    let players = h.players(game.id).await;
    let winner = players.iter().find(|p| p.player_id == guesser).unwrap();
    assert_eq!(winner.score, 60);
    assert_eq!(winner.correct_guesses, 1);
    assert_eq!(h.score(game.id, &drawer).await, 15);

    let names = h.events.names();
    assert!(names.ends_with(&["guess_submitted", "turn_ended", "game_updated"]));
}

#[tokio::test]
async fn near_miss_accepted_by_judge_is_a_fuzzy_win() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let guesser = guessers(&started.turn.drawer_id)[0];

    h.judge.accept("Gattino");
    let outcome = h.guess(started.turn.id, guesser, "Gattino").await.unwrap();
    assert!(matches!(outcome, GuessOutcome::Won { fuzzy: true, points: 80, .. }));
    assert_eq!(h.judge.calls(), 1);

    let recorded = guesses::list_by_turn(&h.db, started.turn.id).await.unwrap();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].is_correct);
    assert!(recorded[0].is_fuzzy_match);
    assert_eq!(recorded[0].guess_text, "Gattino");
}

#[tokio::test]
async fn wrong_guesses_are_recorded_and_can_be_repeated() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let guesser = guessers(&started.turn.drawer_id)[0];

    for text in ["cane", "cavallo"] {
        let outcome = h.guess(started.turn.id, guesser, text).await.unwrap();
        assert_eq!(outcome, GuessOutcome::Rejected);
    }

    let recorded = guesses::list_by_turn(&h.db, started.turn.id).await.unwrap();
    assert_eq!(recorded.len(), 2);
    assert!(recorded.iter().all(|g| !g.is_correct && !g.is_fuzzy_match));
    assert_eq!(h.turn(started.turn.id).await.status, TurnStatus::Drawing);
    assert_eq!(h.score(game.id, guesser).await, 0);

    let outcome = h
        .guess(started.turn.id, guesser, &started.card.word)
        .await
        .unwrap();
    assert!(matches!(outcome, GuessOutcome::Won { .. }));
}

#[tokio::test]
async fn failing_judge_rejects_instead_of_blocking() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let guesser = guessers(&started.turn.drawer_id)[0];

    h.judge.accept("micio");
    h.judge.fail();
    let outcome = h.guess(started.turn.id, guesser, "micio").await.unwrap();
    assert_eq!(outcome, GuessOutcome::Rejected);
    assert_eq!(h.judge.calls(), 1);
    assert_eq!(h.turn(started.turn.id).await.status, TurnStatus::Drawing);
}

#[tokio::test]
async fn guesses_wait_for_the_first_stroke() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let drawer = game.current_drawer_id.clone().unwrap();
    let started = h.start_turn(game.id, &drawer).await.unwrap();

    let err = h
        .guess(started.turn.id, guessers(&drawer)[0], "anything")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TimerNotStarted);
}

#[tokio::test]
async fn guess_preconditions() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let drawer = started.turn.drawer_id.clone();
    let turn_id = started.turn.id;

    let err = h.guess(turn_id, &drawer, &started.card.word).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DrawerCannotGuess);
    assert_eq!(err.status().as_u16(), 403);

    let err = h.guess(turn_id, "mallory", "cane").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAMember);

    let err = h.guess(turn_id, guessers(&drawer)[0], "  \t ").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidGuess);

    let err = h.guess(9_999, guessers(&drawer)[0], "cane").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::TurnNotFound);

    assert!(guesses::list_by_turn(&h.db, turn_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn guesses_after_the_deadline_are_refused() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let guesser = guessers(&started.turn.drawer_id)[0];

    h.advance(80);
    let err = h
        .guess(started.turn.id, guesser, &started.card.word)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TimeExpired);
    assert_eq!(h.score(game.id, guesser).await, 0);
}

#[tokio::test]
async fn guessing_a_finished_turn_reports_it_resolved() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let old_drawer = started.turn.drawer_id.clone();
    let winner = guessers(&old_drawer)[0];

    h.guess(started.turn.id, winner, &started.card.word)
        .await
        .unwrap();

    let new_drawer = h.game(game.id).await.current_drawer_id.unwrap();
    let late = USERS
        .iter()
        .copied()
        .find(|u| *u != old_drawer && *u != new_drawer)
        .unwrap();
    let err = h
        .guess(started.turn.id, late, &started.card.word)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TurnAlreadyFinalizing);
    assert_eq!(h.score(game.id, late).await, 0);
}
