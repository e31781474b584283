//! Repository layer: domain models over the SeaORM adapters, `DomainError` out.

pub mod cards;
pub mod games;
pub mod guesses;
pub mod players;
pub mod turns;
