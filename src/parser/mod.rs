//! Command-line parsing for a single command
//!
//! This module provides:
//! - A flag scanner with abbreviations, toggles and clustered short flags
//! - Cardinality rules for positional arguments
//! - The positional-capture parser combining the two

mod cardinality;
mod destination;
mod options;
mod scanner;

pub use cardinality::{Cardinality, Predicate, PredicateFn};
pub use destination::{ArgMap, ArgumentDestination};
pub use options::{CaptureSink, CommandOptionParser, PositionalMapper, SequenceBinder};
pub use scanner::{Arity, FlagAction, FlagScanner, FlagSpec, FlagValue};
