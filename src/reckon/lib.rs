//! # Reckon Architecture
//!
//! Reckon is a **UI-agnostic calculator library**. The terminal client in
//! `main.rs` is one host; a web page or a GUI could drive the same core.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, reads stdin, prints, picks exit codes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - `Calculator`: one session, owns buffer + history + view  │
//! │  - Emits every visible change to a `View`                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (buffer.rs, eval/, history.rs, keys.rs)               │
//! │  - Input rules, arithmetic parser, history log, key mapping │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - `KeyValueStore` trait                                    │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never exits
//! the process and never assumes a terminal. Diagnostics go through
//! `tracing`; the binary decides whether and where they are printed.
//!
//! ## Module Overview
//!
//! - [`api`]: The `Calculator` facade
//! - [`buffer`]: Expression buffer and input tokens
//! - [`eval`]: Arithmetic lexer, parser and evaluator
//! - [`history`]: Persisted, newest-first evaluation log
//! - [`keys`]: Key press to action mapping
//! - [`render`]: The `View` callback trait
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: `HistoryRecord` and result values
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod buffer;
pub mod config;
pub mod error;
pub mod eval;
pub mod history;
pub mod keys;
pub mod model;
pub mod render;
pub mod store;
