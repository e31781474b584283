//! External oracles: near-miss guess judge and card generator.

pub mod http_generator;
pub mod http_judge;
pub mod trait_def;

pub use http_generator::HttpCardGenerator;
pub use http_judge::HttpGuessJudge;
pub use trait_def::{CardGenerator, ExactOnlyJudge, GuessJudge, OracleError, StaticLibraryGenerator};
