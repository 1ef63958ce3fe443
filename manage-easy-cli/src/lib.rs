//! Manage Easy command-line front end
//!
//! The binary is a thin shell over [`commands`]; the handlers take any
//! [`manage_easy_board::WorkStore`] so they can run against the in-memory
//! store in tests.

pub mod cli;
pub mod commands;
pub mod table;

pub use cli::{Cli, Commands};
