//! # Reckon CLI
//!
//! The binary is intentionally thin: everything terminal-specific lives in
//! `cli/`, and this file only invokes `cli::run()` and maps failures to an
//! exit code. The calculator itself is the `reckon` library.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
