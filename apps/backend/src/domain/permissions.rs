//! Permission predicates over a game and its roster. Pure; callers turn a
//! `false` into an authorization error.

use crate::repos::games::Game;
use crate::repos::players::Player;

pub fn is_player_in_game(roster: &[Player], user_id: &str) -> bool {
    roster.iter().any(|p| p.player_id == user_id)
}

pub fn is_host(roster: &[Player], user_id: &str) -> bool {
    roster.iter().any(|p| p.player_id == user_id && p.is_host)
}

pub fn is_current_drawer(game: &Game, user_id: &str) -> bool {
    game.is_current_drawer(user_id)
}

pub fn can_guess(game: &Game, roster: &[Player], user_id: &str) -> bool {
    is_player_in_game(roster, user_id) && !is_current_drawer(game, user_id)
}
