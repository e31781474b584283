//! Interleavings of the paths that can end a turn.

use drawguess::entities::turns::TurnStatus;
use drawguess::services::game_flow::{GuessAttempt, GuessOutcome};
use drawguess::services::guess_validator::Verdict;
use drawguess::ErrorCode;

use crate::support::harness::Harness;

const USERS: [&str; 3] = ["a", "b", "c"];

async fn prepare(h: &Harness, turn_id: i64, user: &'static str, text: &str) -> GuessAttempt {
    let text = text.to_string();
    h.txn(move |txn, flow| {
        Box::pin(async move { flow.prepare_guess(txn, turn_id, user, &text).await })
    })
    .await
    .expect("guess preconditions hold")
}

async fn resolve(h: &Harness, attempt: GuessAttempt, verdict: Verdict) -> GuessOutcome {
    h.run(move |txn, flow| {
        Box::pin(async move { flow.resolve_guess(txn, &attempt, verdict).await })
    })
    .await
    .expect("guess recorded")
}

fn guessers(drawer: &str) -> Vec<&'static str> {
    USERS.iter().copied().filter(|u| *u != drawer).collect()
}

#[tokio::test]
async fn timeout_landing_first_beats_an_adjudicated_guess() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let drawer = started.turn.drawer_id.clone();
    let guesser = guessers(&drawer)[0];

    h.advance(70);
    let attempt = prepare(&h, started.turn.id, guesser, &started.card.word).await;

    // The judge is slow; the deadline passes before the verdict is recorded.
    h.advance(15);
    let timed_out = h.time_up(started.turn.id, &drawer).await.unwrap();
    assert_eq!(timed_out.status, TurnStatus::TimeUp);

    let outcome = resolve(&h, attempt, Verdict::EXACT).await;
    assert_eq!(outcome, GuessOutcome::AlreadyResolved);

    let turn = h.turn(started.turn.id).await;
    assert_eq!(turn.status, TurnStatus::TimeUp);
    assert_eq!(turn.points_awarded, 0);
    assert_eq!(turn.drawer_points_awarded, 0);
    assert_eq!(turn.winner_id, None);
    for player in h.players(game.id).await {
        assert_eq!(player.score, 0, "{} scored", player.player_id);
    }
}

#[tokio::test]
async fn guess_landing_first_beats_a_late_timeout() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let drawer = started.turn.drawer_id.clone();
    let guesser = guessers(&drawer)[0];

    h.advance(76);
    let attempt = prepare(&h, started.turn.id, guesser, &started.card.word).await;
    let outcome = resolve(&h, attempt, Verdict::EXACT).await;
    assert!(matches!(outcome, GuessOutcome::Won { points: 4, drawer_points: 10, .. }));

    h.advance(10);
    let err = h.time_up(started.turn.id, &drawer).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::TurnAlreadyFinalizing);
    assert!(err.is_lost_race());

    let turn = h.turn(started.turn.id).await;
    assert_eq!(turn.status, TurnStatus::Completed);
    assert_eq!(h.score(game.id, guesser).await, 4);
    assert_eq!(h.score(game.id, &drawer).await, 10);
}

#[tokio::test]
async fn only_the_first_of_two_correct_guessers_scores() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let pair = guessers(&started.turn.drawer_id);
    let (first, second) = (pair[0], pair[1]);

    h.advance(30);
    let a = prepare(&h, started.turn.id, first, &started.card.word).await;
    let b = prepare(&h, started.turn.id, second, &started.card.word).await;

    assert!(matches!(resolve(&h, a, Verdict::EXACT).await, GuessOutcome::Won { points: 50, .. }));
    assert_eq!(
        resolve(&h, b, Verdict::FUZZY).await,
        GuessOutcome::AlreadyResolved
    );

    assert_eq!(h.score(game.id, first).await, 50);
    assert_eq!(h.score(game.id, second).await, 0);
    let turn = h.turn(started.turn.id).await;
    assert_eq!(turn.winner_id.as_deref(), Some(first));
    assert_eq!(turn.correct_guesses, 1);

    // One turn closed means exactly one rotation.
    assert_eq!(h.turns(game.id).await.len(), 1);
    assert_eq!(h.game(game.id).await.round, 0);
}

#[tokio::test]
async fn manual_winner_after_a_guess_win_changes_nothing() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let drawer = started.turn.drawer_id.clone();
    let [first, second] = guessers(&drawer)[..] else {
        panic!("three players means two guessers");
    };

    h.guess(started.turn.id, first, &started.card.word)
        .await
        .unwrap();
    let before = h.players(game.id).await;

    let turn_id = started.turn.id;
    let err = h
        .run(move |txn, flow| {
            Box::pin(async move {
                flow.select_winner(txn, turn_id, &drawer, second, 40, None)
                    .await
            })
        })
        .await
        .unwrap_err();
    // The drawer has already rotated away, so the guard trips first.
    assert!(matches!(
        err.code(),
        ErrorCode::TurnAlreadyFinalizing | ErrorCode::NotCurrentDrawer
    ));
    assert_eq!(h.players(game.id).await, before);
}

#[tokio::test]
async fn scores_never_decrease_over_a_game() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let mut last: Vec<(String, i32)> = Vec::new();

    for n in 0..6 {
        let started = h.drawing_turn(game.id).await;
        h.advance(10 * n);
        if n % 2 == 0 {
            let guesser = guessers(&started.turn.drawer_id)[0];
            h.guess(started.turn.id, guesser, &started.card.word)
                .await
                .unwrap();
        } else {
            h.advance(80);
            h.time_up(started.turn.id, &started.turn.drawer_id)
                .await
                .unwrap();
        }

        let now: Vec<(String, i32)> = h
            .players(game.id)
            .await
            .into_iter()
            .map(|p| (p.player_id, p.score))
            .collect();
        for ((id, before), (_, after)) in last.iter().zip(&now) {
            assert!(after >= before, "{id} went from {before} to {after}");
        }
        last = now;
    }
}

#[tokio::test]
async fn concurrent_guess_and_timeout_finalize_exactly_once() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 3).await;

    for n in 0..6 {
        let started = h.drawing_turn(game.id).await;
        let turn_id = started.turn.id;
        let drawer = started.turn.drawer_id.clone();
        let guesser = guessers(&drawer)[0];
        let before = h.players(game.id).await;

        // Adjudicated with one second left; recorded after the deadline.
        h.advance(79);
        let attempt = prepare(&h, turn_id, guesser, &started.card.word).await;
        h.advance(5);

        let (outcome, timeout) = if n % 2 == 0 {
            tokio::join!(
                resolve(&h, attempt, Verdict::EXACT),
                h.time_up(turn_id, &drawer)
            )
        } else {
            let (timeout, outcome) = tokio::join!(
                h.time_up(turn_id, &drawer),
                resolve(&h, attempt, Verdict::EXACT)
            );
            (outcome, timeout)
        };

        let turn = h.turn(turn_id).await;
        let gained: i32 = h
            .players(game.id)
            .await
            .iter()
            .zip(&before)
            .map(|(after, before)| after.score - before.score)
            .sum();
        match (&outcome, &timeout) {
            (GuessOutcome::Won { points: 1, drawer_points: 10, .. }, Err(err)) => {
                assert!(err.is_lost_race(), "timeout failed with {err:?}");
                assert_eq!(turn.status, TurnStatus::Completed);
                assert_eq!(turn.winner_id.as_deref(), Some(guesser));
                assert_eq!(gained, 11);
            }
            (GuessOutcome::AlreadyResolved, Ok(timed_out)) => {
                assert_eq!(timed_out.status, TurnStatus::TimeUp);
                assert_eq!(turn.status, TurnStatus::TimeUp);
                assert_eq!(turn.winner_id, None);
                assert_eq!(gained, 0);
            }
            other => panic!("turn {turn_id} finalized twice or not at all: {other:?}"),
        }
        assert_eq!(h.turns(game.id).await.len(), n as usize + 1);
    }
}

#[tokio::test]
async fn simultaneous_correct_guesses_award_one_winner() {
    let h = Harness::new().await;
    let game = h.started_game(&USERS, 2).await;
    let started = h.drawing_turn(game.id).await;
    let pair = guessers(&started.turn.drawer_id);
    let (first, second) = (pair[0], pair[1]);
    h.advance(20);

    let word = started.card.word.clone();
    let (a, b) = tokio::join!(
        h.guess(started.turn.id, first, &word),
        h.guess(started.turn.id, second, &word)
    );
    let outcomes = [a.unwrap(), b.unwrap()];
    let wins = outcomes
        .iter()
        .filter(|o| matches!(o, GuessOutcome::Won { .. }))
        .count();
    assert_eq!(wins, 1, "{outcomes:?}");
    assert!(outcomes.contains(&GuessOutcome::AlreadyResolved));

    let turn = h.turn(started.turn.id).await;
    assert_eq!(turn.status, TurnStatus::Completed);
    assert_eq!(turn.correct_guesses, 1);
    let total: i32 = h.players(game.id).await.iter().map(|p| p.score).sum();
    assert_eq!(total, turn.points_awarded + turn.drawer_points_awarded);
    assert_eq!(h.turns(game.id).await.len(), 1);
}
