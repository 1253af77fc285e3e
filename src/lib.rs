//! An in-memory hierarchical filesystem driven by shell-style commands.
//!
//! [`filesystem::Tree`] stores entries, [`paths`] turns user input into
//! canonical paths and resolves them, and [`session::Session`] runs `cd`,
//! `ls`, `mkdir` and friends against a tree.

#![allow(clippy::enum_variant_names)]

pub mod config;
mod ext;
pub mod filesystem;
pub mod paths;
pub mod session;

pub use config::{ConfigError, SeedConfig};
pub use session::{CommandError, CommandOutput, Session};
