//! Shell completion
//!
//! Candidate generation runs in-process and yields a [`Completion`]; the
//! sentinel line form only exists at the boundary with the bash script.

mod generate;
mod install;
mod script;

pub use generate::{expand_toggle, generate, Completion, NO_FS_COMPLETION};
pub use install::{install_completions, install_completions_in, InstallOutcome};
pub use script::{completion_script, completion_script_lines, shell_quote};
