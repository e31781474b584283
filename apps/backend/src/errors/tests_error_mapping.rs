// Error mapping checks: DomainError -> AppError -> HTTP status/code, no DB involved.
use crate::errors::domain::{
    ConflictKind, DomainError, ExhaustedKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_input_validation_to_422() {
    let de = DomainError::validation(ValidationKind::InvalidGuess, "empty guess");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::InvalidGuess);
    assert_eq!(app.status().as_u16(), 422);

    let de = DomainError::validation(ValidationKind::Other("whatever".into()), "bad field");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_state_preconditions_to_409() {
    for (kind, code) in [
        (ValidationKind::PhaseMismatch, "PHASE_MISMATCH"),
        (ValidationKind::GameAlreadyStarted, "GAME_ALREADY_STARTED"),
        (ValidationKind::NotEnoughPlayers, "NOT_ENOUGH_PLAYERS"),
        (ValidationKind::GameFull, "GAME_FULL"),
        (ValidationKind::TurnInProgress, "TURN_IN_PROGRESS"),
        (ValidationKind::TimerNotStarted, "TIMER_NOT_STARTED"),
        (ValidationKind::DeadlineNotReached, "DEADLINE_NOT_REACHED"),
        (ValidationKind::TimeExpired, "TIME_EXPIRED"),
    ] {
        let app: AppError = DomainError::validation(kind, "nope").into();
        assert_eq!(app.code().as_str(), code);
        assert_eq!(app.status().as_u16(), 409);
    }
}

#[test]
fn maps_conflicts() {
    let lost = DomainError::conflict(ConflictKind::TurnAlreadyFinalizing, "resolved");
    let app: AppError = lost.into();
    assert_eq!(app.code().as_str(), "TURN_ALREADY_FINALIZING");
    assert_eq!(app.status().as_u16(), 409);
    assert!(app.is_lost_race());

    let lock = DomainError::conflict(ConflictKind::OptimisticLock, "stale");
    let app: AppError = lock.into();
    assert_eq!(app.code().as_str(), "OPTIMISTIC_LOCK");
    assert!(!app.is_lost_race());

    let other = DomainError::conflict(ConflictKind::Other("x".to_string()), "generic conflict");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::Turn, "no turn");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "TURN_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let nf = DomainError::not_found(NotFoundKind::Other("Record".into()), "gone");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "RECORD_NOT_FOUND");
}

#[test]
fn maps_card_exhaustion_to_retryable_503() {
    let ex = DomainError::exhausted(ExhaustedKind::Cards, "pool empty");
    let app: AppError = ex.into();
    assert_eq!(app.code(), ErrorCode::NoCardsAvailable);
    assert_eq!(app.status().as_u16(), 503);
}

#[test]
fn maps_infra() {
    let t = DomainError::infra(InfraErrorKind::Timeout, "timeout");
    let app: AppError = t.into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let down = DomainError::infra(InfraErrorKind::DbUnavailable, "down");
    let app: AppError = down.into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let corr = DomainError::infra(InfraErrorKind::DataCorruption, "bad");
    let app: AppError = corr.into();
    assert_eq!(app.code().as_str(), "DATA_CORRUPTION");
    assert_eq!(app.status().as_u16(), 500);

    let other = DomainError::infra(InfraErrorKind::Other("unknown".to_string()), "other");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "INTERNAL_ERROR");
    assert_eq!(app.status().as_u16(), 500);
}
