//! Core types for the SAHPAATHI backend
//!
//! This crate contains domain types shared across all other crates.

mod constants;
mod env_config;
mod session;
mod teacher;

pub use constants::*;
pub use env_config::*;
pub use session::*;
pub use teacher::*;
