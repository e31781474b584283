pub mod card_pool;
pub mod context;
pub mod game_flow;
pub mod guess_validator;
pub mod permissions;
pub mod queries;
