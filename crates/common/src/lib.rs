//! Shared building blocks for the restaurant service crates.

pub mod types;
pub mod utils;
