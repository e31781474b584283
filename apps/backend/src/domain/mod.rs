//! Domain layer: pure game rules. No I/O, no SeaORM, no actix.

pub mod card_library;
pub mod guess_text;
pub mod permissions;
pub mod rotation;
pub mod scoring;

#[cfg(test)]
mod tests_props_rotation;
#[cfg(test)]
mod tests_props_scoring;
