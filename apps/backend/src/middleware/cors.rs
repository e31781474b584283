use actix_cors::Cors;
use actix_web::http::header;

use crate::extractors::current_user::{USERNAME_HEADER, USER_ID_HEADER};

/// CORS for the browser client. Origins come from `CORS_ALLOWED_ORIGINS`;
/// only http(s) origins are honored and an empty list falls back to localhost.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let mut origins: Vec<&str> = allowed_origins
        .iter()
        .map(String::as_str)
        .filter(|o| *o != "null")
        .filter(|o| o.starts_with("http://") || o.starts_with("https://"))
        .collect();
    if origins.is_empty() {
        origins = vec!["http://localhost:3000", "http://127.0.0.1:3000"];
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(USER_ID_HEADER),
            header::HeaderName::from_static(USERNAME_HEADER),
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
            header::RETRY_AFTER,
        ])
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}
