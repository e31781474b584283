//! Infrastructure layer: connection bootstrap, state building, DB error mapping.

pub mod db;
pub mod db_errors;
pub mod state;
