//! Error codes for the drawguess API.
//!
//! Every code surfaced to callers lives here; never pass ad-hoc strings as
//! error codes. Codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in Problem Details bodies.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Identity & permissions
    /// Caller identity missing
    Unauthorized,
    /// Access denied
    Forbidden,
    /// Caller is not a player of the game
    NotAMember,
    /// Operation reserved to the game's host
    NotHost,
    /// Operation reserved to the current drawer
    NotCurrentDrawer,
    /// The drawer tried to guess their own word
    DrawerCannotGuess,

    // Request validation
    InvalidGameId,
    InvalidTurnId,
    InvalidGuess,
    InvalidMaxRounds,
    InvalidCategory,
    InvalidJoinCode,
    InvalidWinner,
    ValidationError,
    BadRequest,
    InvalidHeader,

    // Not found
    GameNotFound,
    TurnNotFound,
    PlayerNotFound,
    CardNotFound,
    NotFound,

    // Preconditions / state machine
    /// Game is not in the status required by the operation
    PhaseMismatch,
    GameAlreadyStarted,
    NotEnoughPlayers,
    /// The roster is at `max_players`
    GameFull,
    /// Another turn is still drawing or completing
    TurnInProgress,
    /// The turn left `drawing` before this call could transition it
    TurnAlreadyFinalizing,
    /// The drawer has not put ink on the canvas yet
    TimerNotStarted,
    DeadlineNotReached,
    TimeExpired,
    JoinCodeConflict,
    OptimisticLock,
    Conflict,

    // Retryable exhaustion
    NoCardsAvailable,

    // System errors
    DbError,
    DbUnavailable,
    DbTimeout,
    UniqueViolation,
    FkViolation,
    RecordNotFound,
    InternalError,
    ConfigError,
    DataCorruption,
}

impl ErrorCode {
    /// Canonical string for this code, exactly as it appears in responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::NotHost => "NOT_HOST",
            Self::NotCurrentDrawer => "NOT_CURRENT_DRAWER",
            Self::DrawerCannotGuess => "DRAWER_CANNOT_GUESS",

            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::InvalidTurnId => "INVALID_TURN_ID",
            Self::InvalidGuess => "INVALID_GUESS",
            Self::InvalidMaxRounds => "INVALID_MAX_ROUNDS",
            Self::InvalidCategory => "INVALID_CATEGORY",
            Self::InvalidJoinCode => "INVALID_JOIN_CODE",
            Self::InvalidWinner => "INVALID_WINNER",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::TurnNotFound => "TURN_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::CardNotFound => "CARD_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::GameFull => "GAME_FULL",
            Self::TurnInProgress => "TURN_IN_PROGRESS",
            Self::TurnAlreadyFinalizing => "TURN_ALREADY_FINALIZING",
            Self::TimerNotStarted => "TIMER_NOT_STARTED",
            Self::DeadlineNotReached => "DEADLINE_NOT_REACHED",
            Self::TimeExpired => "TIME_EXPIRED",
            Self::JoinCodeConflict => "JOIN_CODE_CONFLICT",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::NoCardsAvailable => "NO_CARDS_AVAILABLE",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
