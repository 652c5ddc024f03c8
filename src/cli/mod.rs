//! CLI interface and argument parsing
//!
//! This module wires the `toolkit` binary: host flags are parsed with clap,
//! everything else is handed to the program built from the configuration.

pub mod app;

// Re-export main types
pub use app::*;
