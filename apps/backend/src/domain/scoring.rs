//! Turn scoring.
//!
//! The guesser earns the seconds left on the clock. The drawer earns
//! `max(10, remaining / 4)`, and only when somebody actually guessed.

/// Floor for the drawer bonus on a guessed turn.
pub const DRAWER_MIN_BONUS: i32 = 10;

/// Points split for a resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnAward {
    pub guesser_points: i32,
    pub drawer_points: i32,
}

impl TurnAward {
    /// Nobody guessed: nobody scores.
    pub const NONE: TurnAward = TurnAward {
        guesser_points: 0,
        drawer_points: 0,
    };
}

pub fn guesser_points(remaining_seconds: i32) -> i32 {
    remaining_seconds.max(0)
}

pub fn drawer_points(remaining_seconds: i32, had_correct_guess: bool) -> i32 {
    if !had_correct_guess {
        return 0;
    }
    DRAWER_MIN_BONUS.max(remaining_seconds.max(0) / 4)
}

/// Award for a turn won with `remaining_seconds` left.
pub fn award_for_win(remaining_seconds: i32) -> TurnAward {
    TurnAward {
        guesser_points: guesser_points(remaining_seconds),
        drawer_points: drawer_points(remaining_seconds, true),
    }
}
