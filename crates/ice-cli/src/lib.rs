//! Shift reconciliation CLI library.
//!
//! This crate provides the CLI interface over `ice-core` and `ice-api`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
