use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use super::game_id::positive_id;
use crate::error::AppError;
use crate::errors::ErrorCode;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TurnId(pub i64);

impl FromRequest for TurnId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(positive_id(req, "turn_id", ErrorCode::InvalidTurnId).map(TurnId))
    }
}
