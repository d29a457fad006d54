//! # CLI Layer
//!
//! One possible host for the calculator. This is the only place that:
//! - Knows about stdin, stdout and stderr
//! - Parses arguments
//! - Installs a tracing subscriber
//! - Formats values for a human at a terminal
//!
//! ## Structure
//!
//! - `setup.rs`: clap definitions
//! - `commands.rs`: context setup and per-command handlers
//! - `print.rs`: terminal output and the `TerminalView` used by the REPL

mod commands;
mod print;
mod setup;

pub use commands::run;
