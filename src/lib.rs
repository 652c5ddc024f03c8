//! Toolkit programs: multi-command CLIs with declarative positional policies
//!
//! A [`Program`] dispatches its first argument to a registered [`Command`].
//! Commands parse their flags with a [`CommandOptionParser`], which also
//! enforces how many positional arguments are allowed, captures them into a
//! destination, and answers bash completion queries through the
//! `--flag-completion` protocol.
//!
//! The `toolkit` binary builds such a program from a `toolkit.yml` file whose
//! commands run shell lines.

// Public modules
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod parser;
pub mod program;
pub mod runner;

// Re-export commonly used types
pub use error::{invalid_args, Result, ToolkitError};
pub use parser::{ArgMap, ArgumentDestination, CaptureSink, Cardinality, CommandOptionParser};
pub use program::{Command, HandlerResult, Invocation, Program};

/// Current version of toolkit-program
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
