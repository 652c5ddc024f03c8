//! Completion candidate generation
//!
//! Replays the words typed so far against a command's parser, using a
//! scratch destination, to decide which flags to offer and whether the shell
//! should also offer file names.

use crate::error::ParseError;
use crate::parser::{ArgumentDestination, CommandOptionParser};

/// First protocol line telling the shell not to add file name completions
pub const NO_FS_COMPLETION: &str = "!NOFSCOMP!";

/// Outcome of one completion request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub candidates: Vec<String>,
    pub suppress_filesystem: bool,
}

impl Completion {
    /// Nothing to offer; the shell may still complete file names
    pub fn defer() -> Self {
        Self::default()
    }

    /// Nothing to offer and nothing the shell should add
    pub fn dead_end() -> Self {
        Completion {
            candidates: Vec::new(),
            suppress_filesystem: true,
        }
    }

    /// Protocol lines: the sentinel first when suppressing, then candidates
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.candidates.len() + 1);
        if self.suppress_filesystem {
            lines.push(NO_FS_COMPLETION.to_string());
        }
        lines.extend(self.candidates.iter().cloned());
        lines
    }

    /// Protocol text, one newline-terminated line each
    pub fn to_protocol(&self) -> String {
        self.lines().iter().map(|l| format!("{}\n", l)).collect()
    }
}

/// Complete `in_progress` given the words before it
///
/// The live destination is never involved: flag actions fire against
/// `D::default()`, so repeated requests against the same parser agree.
pub fn generate<D, S>(parser: &CommandOptionParser<D>, preceding: &[S], in_progress: &str) -> Completion
where
    D: ArgumentDestination,
    S: AsRef<str>,
{
    let prefix = if in_progress.is_empty() { "-" } else { in_progress };
    let raw = parser.candidates(prefix);

    let mut scratch = D::default();
    let positional_count = match parser.parse(preceding, &mut scratch) {
        Ok(positionals) => positionals.len(),
        Err(err) if err.is_missing_argument() => return Completion::defer(),
        Err(ParseError::WrongArgumentCount { .. }) => return Completion::defer(),
        Err(ParseError::Rule(_)) => return Completion::defer(),
        Err(ParseError::Scan(_)) => return Completion::dead_end(),
    };

    let suppress_filesystem =
        in_progress.is_empty() && !parser.cardinality_satisfied_with(positional_count + 1, &scratch);

    let candidates = raw
        .iter()
        .filter(|c| c.starts_with("--"))
        .flat_map(|c| expand_toggle(c))
        .collect();

    Completion {
        candidates,
        suppress_filesystem,
    }
}

/// Concrete forms of a spelling: `--[no-]x` becomes `--x` and `--no-x`
pub fn expand_toggle(spelling: &str) -> Vec<String> {
    let toggle = spelling
        .strip_prefix("--[")
        .and_then(|rest| rest.split_once(']'))
        .filter(|(negation, _)| {
            negation.len() > 1
                && negation.ends_with('-')
                && negation[..negation.len() - 1]
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_')
        });
    match toggle {
        Some((negation, name)) => vec![format!("--{}", name), format!("--{}{}", negation, name)],
        None => vec![spelling.to_string()],
    }
}
