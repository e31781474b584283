//! Backend test support utilities
//!
//! Shared helpers for the backend test binaries: unified logging
//! initialization, Problem Details assertions and unique identity helpers.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
