//! Game tunables, read once at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::card_library;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// Seconds a drawer has once the first stroke lands
    pub turn_seconds: i32,
    /// Cards requested when a game is created
    pub initial_cards: usize,
    /// Upper bound accepted for `max_rounds` on create
    pub max_rounds_limit: i32,
    /// Players required to start, and to keep a started game alive
    pub min_players: usize,
    /// Roster cap; joins beyond it are refused
    pub max_players: usize,
    pub judge_timeout: Duration,
    pub generator_timeout: Duration,
    pub judge_url: Option<String>,
    pub generator_url: Option<String>,
    pub blob_dir: String,
    pub blob_base_url: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            turn_seconds: 80,
            initial_cards: 8,
            max_rounds_limit: 10,
            min_players: 2,
            max_players: 8,
            judge_timeout: Duration::from_millis(3000),
            generator_timeout: Duration::from_millis(10_000),
            judge_url: None,
            generator_url: None,
            blob_dir: "./data/drawings".to_string(),
            blob_base_url: "/drawings".to_string(),
        }
    }
}

impl GameSettings {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let settings = Self {
            turn_seconds: parse_var("DRAWGUESS_TURN_SECONDS", defaults.turn_seconds)?,
            initial_cards: parse_var("DRAWGUESS_INITIAL_CARDS", defaults.initial_cards)?,
            max_rounds_limit: parse_var("DRAWGUESS_MAX_ROUNDS_LIMIT", defaults.max_rounds_limit)?,
            min_players: parse_var("DRAWGUESS_MIN_PLAYERS", defaults.min_players)?,
            max_players: parse_var("DRAWGUESS_MAX_PLAYERS", defaults.max_players)?,
            judge_timeout: Duration::from_millis(parse_var("DRAWGUESS_JUDGE_TIMEOUT_MS", 3000u64)?),
            generator_timeout: Duration::from_millis(parse_var(
                "DRAWGUESS_GENERATOR_TIMEOUT_MS",
                10_000u64,
            )?),
            judge_url: optional_var("DRAWGUESS_JUDGE_URL"),
            generator_url: optional_var("DRAWGUESS_GENERATOR_URL"),
            blob_dir: optional_var("DRAWGUESS_BLOB_DIR").unwrap_or(defaults.blob_dir),
            blob_base_url: optional_var("DRAWGUESS_BLOB_BASE_URL")
                .unwrap_or(defaults.blob_base_url),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.turn_seconds <= 0 {
            return Err(AppError::config("DRAWGUESS_TURN_SECONDS must be positive"));
        }
        if self.max_rounds_limit < 1 {
            return Err(AppError::config("DRAWGUESS_MAX_ROUNDS_LIMIT must be at least 1"));
        }
        if self.min_players < 2 {
            return Err(AppError::config("DRAWGUESS_MIN_PLAYERS must be at least 2"));
        }
        if self.max_players < self.min_players {
            return Err(AppError::config(
                "DRAWGUESS_MAX_PLAYERS must not be below DRAWGUESS_MIN_PLAYERS",
            ));
        }
        // Every turn of the longest game must be coverable by the built-in library.
        let longest_game = self.max_players.saturating_mul(self.max_rounds_limit as usize);
        let library = card_library::capacity();
        if longest_game > library {
            return Err(AppError::config(format!(
                "{} players x {} rounds needs {longest_game} cards, the built-in library has {library}",
                self.max_players, self.max_rounds_limit
            )));
        }
        Ok(())
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{name} has an invalid value '{raw}'"))),
    }
}
