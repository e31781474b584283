//! Property tests for turn scoring (pure domain, no DB).

use proptest::prelude::*;

use crate::domain::scoring::{award_for_win, drawer_points, guesser_points, DRAWER_MIN_BONUS};

proptest! {
    #[test]
    fn prop_drawer_bonus_rule(remaining in 0i32..=600) {
        let award = award_for_win(remaining);
        prop_assert_eq!(award.drawer_points, std::cmp::max(10, remaining / 4));
        prop_assert_eq!(drawer_points(remaining, false), 0);
    }

    #[test]
    fn prop_awards_never_negative(remaining in -1000i32..=1000) {
        prop_assert!(guesser_points(remaining) >= 0);
        prop_assert!(drawer_points(remaining, true) >= DRAWER_MIN_BONUS);
        prop_assert!(drawer_points(remaining, false) == 0);
    }

    #[test]
    fn prop_guesser_points_monotone_in_time_left(a in 0i32..=600, b in 0i32..=600) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(guesser_points(lo) <= guesser_points(hi));
    }
}
