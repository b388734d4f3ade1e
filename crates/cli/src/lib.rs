//! Command line access to the model service without running the server.
//!
//! - [`Command`] — Parsed subcommands
//! - [`Cli`] — Executes commands against a [`mlh_server::Hub`]
mod command;
mod runner;

pub use command::*;
pub use runner::*;
