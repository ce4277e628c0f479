//! CLI subcommands.

pub mod common;
pub mod params;
pub mod process;
pub mod render;
