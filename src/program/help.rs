//! Help rendering and styling

use crate::error::Expectation;
use crate::parser::{ArgumentDestination, CommandOptionParser, FlagSpec};
use colored::Colorize;
use std::fmt;

/// A text transformation applied to one kind of help fragment
pub type StyleFn = fn(&str) -> String;

/// Styling rules for help and error output
#[derive(Clone, Copy)]
pub struct HelpStyling {
    title: StyleFn,
    code: StyleFn,
    param: StyleFn,
    error_marker: StyleFn,
}

impl HelpStyling {
    /// Terminal colors, subject to the usual `NO_COLOR`/tty detection
    pub fn colored() -> Self {
        HelpStyling {
            title: |s| format!("*** {} ***", s).as_str().bright_white().bold().on_blue().to_string(),
            code: |s| s.bold().to_string(),
            param: |s| s.italic().to_string(),
            error_marker: |s| s.bold().red().on_black().to_string(),
        }
    }

    /// No escapes at all
    pub fn plain() -> Self {
        HelpStyling {
            title: |s| format!("*** {} ***", s),
            code: str::to_string,
            param: str::to_string,
            error_marker: str::to_string,
        }
    }

    pub fn with_title(mut self, style: StyleFn) -> Self {
        self.title = style;
        self
    }

    pub fn with_code(mut self, style: StyleFn) -> Self {
        self.code = style;
        self
    }

    pub fn with_param(mut self, style: StyleFn) -> Self {
        self.param = style;
        self
    }

    pub fn with_error_marker(mut self, style: StyleFn) -> Self {
        self.error_marker = style;
        self
    }

    pub fn title(&self, s: &str) -> String {
        (self.title)(s)
    }

    pub fn code(&self, s: &str) -> String {
        (self.code)(s)
    }

    pub fn param(&self, s: &str) -> String {
        (self.param)(s)
    }

    pub fn error_marker(&self, s: &str) -> String {
        (self.error_marker)(s)
    }
}

impl fmt::Debug for HelpStyling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpStyling")
            .field("sample", &self.title("title"))
            .finish()
    }
}

impl Default for HelpStyling {
    fn default() -> Self {
        Self::colored()
    }
}

/// What help needs to know about a command's parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserHelp {
    /// `None` when the positional count is unconstrained
    pub cardinality: Option<Expectation>,
    pub explanation: Option<String>,
    /// Help column and summary for each flag
    pub options: Vec<(String, Option<String>)>,
}

impl ParserHelp {
    pub fn of<D: ArgumentDestination>(parser: &CommandOptionParser<D>) -> Self {
        ParserHelp {
            cardinality: parser.positional_cardinality().map(|c| c.expectation()),
            explanation: parser.describe_cardinality(),
            options: parser.flags().flags().iter().map(option_line).collect(),
        }
    }
}

fn option_line<D>(flag: &FlagSpec<D>) -> (String, Option<String>) {
    let mut column = flag.help_spelling();
    if column.starts_with("--") {
        column = format!("    {}", column);
    }
    (column, flag.summary_text().map(str::to_string))
}

const OPTION_INDENT: &str = "    ";
const OPTION_WIDTH: usize = 32;

/// Overall help: title, usage and the listable commands
pub fn render_overview(
    styling: &HelpStyling,
    title: &str,
    script: &str,
    commands: &[(&str, &str)],
) -> String {
    let s = styling;
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{}\n\n", s.title(title)));
    out.push_str(&format!(
        "Usage: {} {} [{}]\n\n",
        s.code(script),
        s.param("COMMAND"),
        s.param("OPTION ...")
    ));
    out.push_str("Available options vary depending on the command given. For details\n");
    out.push_str("of a particular command, use:\n\n");
    out.push_str(&format!(
        "    {} {} {}\n\n",
        s.code(script),
        s.code("help"),
        s.param("COMMAND")
    ));
    out.push_str("Commands:\n");
    let width = commands.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, usage) in commands {
        out.push_str(&format!(
            "    {}   {}\n",
            s.code(&format!("{:>width$}", name, width = width)),
            usage
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "Use {} {} to get more help on a specific command.\n\n",
        s.code("help"),
        s.param("COMMAND")
    ));
    out
}

/// Help for one command
///
/// `parser` is `None` for commands that take their arguments raw.
pub fn render_command(
    styling: &HelpStyling,
    title: &str,
    script: &str,
    name: &str,
    description: &str,
    parser: Option<&ParserHelp>,
) -> String {
    let s = styling;
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{}\n\n", s.title(title)));
    out.push_str(&format!(
        "Usage: {}\n\n",
        usage_parts(styling, script, name, parser).join(" ")
    ));
    out.push_str(description);
    out.push('\n');

    if let Some(help) = parser {
        if let Some(explanation) = &help.explanation {
            out.push_str(&format!("\n{}\n", explanation));
        }
        if !help.options.is_empty() {
            out.push_str("\nOptions:\n");
            for (column, summary) in &help.options {
                out.push_str(&format_option(column, summary.as_deref()));
            }
        }
    }
    out.push('\n');
    out
}

fn usage_parts(
    styling: &HelpStyling,
    script: &str,
    name: &str,
    parser: Option<&ParserHelp>,
) -> Vec<String> {
    let s = styling;
    let mut parts = vec![s.code(script), s.code(name)];
    let options_usage = format!("[{}]", s.param("OPTION ..."));
    let generic = format!("[{} ...]", s.param("ARG"));

    let Some(help) = parser else {
        parts.push(options_usage);
        parts.push(generic);
        return parts;
    };

    if !help.options.is_empty() {
        parts.push(options_usage);
    }
    match &help.cardinality {
        Some(Expectation::Exact(n)) => {
            parts.extend(std::iter::repeat(s.param("ARG")).take(*n));
        }
        Some(Expectation::Range { lo: 0, hi: 1 }) => parts.push(format!("[{}]", s.param("ARG"))),
        Some(Expectation::Range { lo, .. }) if *lo > 0 => {
            parts.push(format!("{} ...", s.param("ARG")))
        }
        _ => parts.push(generic),
    }
    parts
}

fn format_option(column: &str, summary: Option<&str>) -> String {
    match summary {
        None => format!("{}{}\n", OPTION_INDENT, column),
        Some(text) if column.len() < OPTION_WIDTH => format!(
            "{}{:<width$} {}\n",
            OPTION_INDENT,
            column,
            text,
            width = OPTION_WIDTH
        ),
        Some(text) => format!(
            "{}{}\n{}{:width$} {}\n",
            OPTION_INDENT,
            column,
            OPTION_INDENT,
            "",
            text,
            width = OPTION_WIDTH
        ),
    }
}
