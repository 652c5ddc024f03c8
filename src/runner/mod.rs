//! Command script execution
//!
//! This module runs the shell lines of YAML-defined commands: variable
//! interpolation, the interpreter, and assembling a program from a
//! configuration.

pub mod command;
pub mod context;
pub mod interpolate;
pub mod script;

// Re-export main types
pub use command::*;
pub use context::*;
pub use interpolate::*;
pub use script::*;
