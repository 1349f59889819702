//! Shared building blocks for the users API workspace.

pub mod types;
pub mod utils;
