//! SeaORM adapters. Every function is generic over `ConnectionTrait` and
//! returns `sea_orm::DbErr`; repos translate to `DomainError`.

pub mod cards_sea;
pub mod games_sea;
pub mod guesses_sea;
pub mod players_sea;
pub mod turns_sea;
