//! Property tests for drawer rotation (pure domain, no DB).
//!
//! Simulates whole games against `plan_advance`: with N players and M rounds
//! the game must finish after exactly N*M turns, and every player draws once
//! per round, even when someone who already drew leaves mid-round.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::domain::rotation::{plan_advance, Advance};

proptest! {
    #[test]
    fn prop_game_finishes_after_n_times_m_turns(
        players in 2usize..=8,
        max_rounds in 1i32..=5,
        first in 0usize..8,
    ) {
        let roster: Vec<String> = (0..players).map(|i| format!("p{i}")).collect();
        let mut drawer = roster[first % players].clone();
        let mut round = 0i32;
        let mut drawn: Vec<String> = Vec::new();
        let mut opener: Option<String> = None;
        let mut turns = 0usize;
        let mut draws: HashMap<(i32, String), usize> = HashMap::new();

        loop {
            prop_assert!(turns < players * max_rounds as usize, "extra turn played");
            turns += 1;
            drawn.push(drawer.clone());
            *draws.entry((round, drawer.clone())).or_default() += 1;
            if opener.is_none() {
                opener = Some(drawer.clone());
            }

            match plan_advance(&roster, round, max_rounds, &drawn, &drawer, opener.as_deref()) {
                Some(Advance::NextDrawer { next_drawer }) => drawer = next_drawer,
                Some(Advance::NextRound { round: r, next_drawer }) => {
                    round = r;
                    drawn.clear();
                    opener = None;
                    drawer = next_drawer;
                }
                Some(Advance::Finished { round: r }) => {
                    prop_assert_eq!(r, max_rounds);
                    break;
                }
                None => prop_assert!(false, "rotation stalled"),
            }
        }

        prop_assert_eq!(turns, players * max_rounds as usize);
        prop_assert!(draws.values().all(|&n| n == 1), "someone drew twice in a round");
    }

    #[test]
    fn prop_past_drawer_leaving_keeps_the_round_open(
        players in 3usize..=8,
        first in 0usize..8,
        played in 0usize..8,
        pick in 0usize..8,
    ) {
        let mut roster: Vec<String> = (0..players).map(|i| format!("p{i}")).collect();
        let played = 1 + played % (players - 1);
        let mut drawer = roster[first % players].clone();
        let opener = drawer.clone();
        let mut drawn: Vec<String> = Vec::new();
        let mut departed = false;

        loop {
            prop_assert!(!drawn.contains(&drawer), "{} drew twice", drawer);
            drawn.push(drawer.clone());
            match plan_advance(&roster, 0, 3, &drawn, &drawer, Some(&opener)) {
                Some(Advance::NextDrawer { next_drawer }) => drawer = next_drawer,
                Some(Advance::NextRound { .. }) => break,
                other => prop_assert!(false, "unexpected plan {:?}", other),
            }
            if !departed && drawn.len() == played {
                let leaver = drawn[pick % drawn.len()].clone();
                roster.retain(|p| *p != leaver);
                departed = true;
            }
        }

        prop_assert!(departed);
        prop_assert!(roster.iter().all(|p| drawn.contains(p)), "someone skipped their turn");
    }
}
