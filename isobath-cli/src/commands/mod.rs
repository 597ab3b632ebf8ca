//! CLI subcommands.

pub mod build;
pub mod common;
pub mod config;
pub mod get;
pub mod levels;
pub mod verify;
