use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde::Serialize;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USERNAME_HEADER: &str = "x-username";

/// Longest accepted user id or display name, in characters.
const MAX_IDENTITY_CHARS: usize = 64;

/// Caller identity. Authentication happens upstream; the id is trusted as
/// given but must be present and printable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub user_id: String,
    pub username: String,
}

impl CurrentUser {
    pub fn from_headers(req: &HttpRequest) -> Result<Self, AppError> {
        let user_id = match header_value(req, USER_ID_HEADER)? {
            Some(id) if !id.is_empty() => id,
            _ => return Err(AppError::unauthorized()),
        };
        if user_id.chars().count() > MAX_IDENTITY_CHARS {
            return Err(AppError::invalid(
                ErrorCode::InvalidHeader,
                format!("{USER_ID_HEADER} is longer than {MAX_IDENTITY_CHARS} characters"),
            ));
        }

        let username = header_value(req, USERNAME_HEADER)?
            .filter(|name| !name.is_empty())
            .map(|name| name.chars().take(MAX_IDENTITY_CHARS).collect())
            .unwrap_or_else(|| user_id.clone());

        Ok(Self { user_id, username })
    }
}

fn header_value(req: &HttpRequest, name: &str) -> Result<Option<String>, AppError> {
    let Some(raw) = req.headers().get(name) else {
        return Ok(None);
    };
    let value = raw.to_str().map_err(|_| {
        AppError::invalid(ErrorCode::InvalidHeader, format!("{name} must be visible ASCII"))
    })?;
    Ok(Some(value.trim().to_string()))
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}
