use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Positive id parsed from the `{param}` path segment.
pub(crate) fn positive_id(
    req: &HttpRequest,
    param: &str,
    code: ErrorCode,
) -> Result<i64, AppError> {
    let raw = req
        .match_info()
        .get(param)
        .ok_or_else(|| AppError::bad_request(code, format!("Missing {param} parameter")))?;

    let id = raw
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(code, format!("Invalid {param}: {raw}")))?;

    if id <= 0 {
        return Err(AppError::bad_request(
            code,
            format!("{param} must be positive, got: {id}"),
        ));
    }
    Ok(id)
}

/// Game ID extracted from the route path parameter. Existence is checked
/// by the operation itself.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GameId(pub i64);

impl FromRequest for GameId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(positive_id(req, "game_id", ErrorCode::InvalidGameId).map(GameId))
    }
}
