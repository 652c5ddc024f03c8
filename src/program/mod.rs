//! Toolkit programs: a registry of named commands plus built-in help and
//! completion commands
//!
//! The first command-line argument names the command; the rest belong to it.
//! Built-ins are `help`, `-h`, `--help`, `--commands`, `--flag-completion`
//! and `--install-completions`.

pub mod command;
pub mod help;

pub use command::{Command, CommandBody, HandlerResult, Invocation};
pub use help::{HelpStyling, ParserHelp, StyleFn};

use crate::completion::{install_completions, Completion};
use crate::error::{ConfigError, Result, ToolkitError};
use std::env;
use std::io::{self, Write};
use std::path::Path;

/// Placeholder used where the script name cannot be determined
pub const SCRIPT_PLACEHOLDER: &str = "<script-name>";

/// Environment variable consulted when argv[0] gives no script name
pub const SCRIPT_ENV: &str = "THIS_SCRIPT";

const HELP_USAGE: &str = "Show a list of commands or details of one command";

const BUILTINS: &[&str] = &[
    "help",
    "-h",
    "--help",
    "--commands",
    "--flag-completion",
    "--install-completions",
];

/// Whether `name` belongs to a built-in command
pub fn is_reserved_name(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// A multi-command CLI program
#[derive(Debug, Default)]
pub struct Program {
    title: Option<String>,
    script_name: Option<String>,
    styling: HelpStyling,
    commands: Vec<Command>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Override the script name otherwise taken from the process arguments
    pub fn with_script_name(mut self, name: &str) -> Self {
        self.script_name = Some(name.to_string());
        self
    }

    pub fn with_styling(mut self, styling: HelpStyling) -> Self {
        self.styling = styling;
        self
    }

    pub fn styling(&self) -> &HelpStyling {
        &self.styling
    }

    /// Title shown at the top of help, defaulting to "<Script> Toolkit Program"
    pub fn title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("{} Toolkit Program", capitalize(&self.script_name())),
        }
    }

    /// Name the program is invoked as
    pub fn script_name(&self) -> String {
        self.known_script_name()
            .unwrap_or_else(|| SCRIPT_PLACEHOLDER.to_string())
    }

    fn known_script_name(&self) -> Option<String> {
        if let Some(name) = &self.script_name {
            return Some(name.clone());
        }
        let from_argv = env::args()
            .next()
            .filter(|arg| !arg.is_empty() && arg != "-")
            .and_then(|arg| {
                Path::new(&arg)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            });
        from_argv.or_else(|| env::var(SCRIPT_ENV).ok().filter(|v| !v.is_empty()))
    }

    /// Add a command; built-in names are reserved
    pub fn register(&mut self, command: Command) -> Result<&mut Self> {
        if is_reserved_name(command.name()) {
            return Err(ConfigError::ReservedName(command.name().to_string()).into());
        }
        if self.find(command.name()).is_some() {
            return Err(ConfigError::Invalid(format!(
                "command '{}' is defined more than once",
                command.name()
            ))
            .into());
        }
        self.commands.push(command);
        Ok(self)
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Names and one-line usages of the commands shown in help, `help`
    /// included, sorted by name
    pub fn listable_commands(&self) -> Vec<(&str, &str)> {
        let mut listed: Vec<(&str, &str)> = self
            .commands
            .iter()
            .filter(|c| c.is_listable())
            .map(|c| (c.name(), c.usage_text().unwrap_or_default()))
            .collect();
        listed.push(("help", HELP_USAGE));
        listed.sort_by(|a, b| a.0.cmp(b.0));
        listed
    }

    /// Run the command named by `argv[0]`, writing built-in output to stdout
    pub fn run<S: AsRef<str>>(&self, argv: &[S]) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(argv, &mut out)
    }

    /// Run the command named by `argv[0]`, writing built-in output to `out`
    pub fn run_with_output<S: AsRef<str>>(&self, argv: &[S], out: &mut dyn Write) -> Result<()> {
        let argv: Vec<String> = argv.iter().map(|a| a.as_ref().to_string()).collect();
        let (name, args) = argv.split_first().ok_or(ToolkitError::NoCommand)?;
        let (name, args) = rewrite_help_request(name, args);

        match name.as_str() {
            "help" | "-h" | "--help" => {
                let text = self.render_help(args.first().map(String::as_str));
                out.write_all(text.as_bytes())?;
            }
            "--commands" => {
                let names: Vec<&str> = self.listable_commands().into_iter().map(|(n, _)| n).collect();
                writeln!(out, "{}", names.join(" "))?;
            }
            "--flag-completion" => {
                if let Some(completion) = self.flag_completion(&args) {
                    out.write_all(completion.to_protocol().as_bytes())?;
                }
            }
            "--install-completions" => {
                let script = self.known_script_name().ok_or_else(|| {
                    ToolkitError::Config(ConfigError::Invalid("script name unknown".to_string()))
                })?;
                for line in install_completions(&script)?.messages() {
                    writeln!(out, "{}", line)?;
                }
            }
            _ => {
                let command = self
                    .find(&name)
                    .ok_or_else(|| ToolkitError::UnknownName(name.clone()))?;
                command.body().invoke(&name, args)?;
            }
        }
        Ok(())
    }

    /// Run, report any error on stderr and return the process exit status
    pub fn execute<S: AsRef<str>>(&self, argv: &[S]) -> i32 {
        match self.run(argv) {
            Ok(()) => 0,
            Err(err) => {
                self.report_error(&err);
                err.exit_code()
            }
        }
    }

    /// Help text: the overview, or one command's help when `name` is known
    pub fn render_help(&self, name: Option<&str>) -> String {
        let title = self.title();
        let script = self.script_name();
        if name == Some("help") {
            return help::render_command(
                &self.styling,
                &title,
                &script,
                "help",
                &self.help_description(),
                None,
            );
        }
        match name.and_then(|n| self.find(n)) {
            Some(command) => help::render_command(
                &self.styling,
                &title,
                &script,
                command.name(),
                &command.full_description(),
                command.body().help().as_ref(),
            ),
            None => help::render_overview(&self.styling, &title, &script, &self.listable_commands()),
        }
    }

    fn help_description(&self) -> String {
        let s = &self.styling;
        format!(
            "{}\n\nTo get help on a specific command, put the command's name as the first\n\
             argument after {} or use {} or {} after the command's name.",
            HELP_USAGE,
            s.code("help"),
            s.code("-h"),
            s.code("--help")
        )
    }

    /// Completion for `--flag-completion SCRIPT COMMAND WORDS...`
    ///
    /// The last word is the one being completed. Malformed requests and
    /// commands without a parser produce nothing.
    pub fn flag_completion(&self, args: &[String]) -> Option<Completion> {
        let (_script, rest) = args.split_first()?;
        let (command, words) = rest.split_first()?;
        let (in_progress, preceding) = words.split_last()?;
        self.find(command)?.body().complete(preceding, in_progress)
    }

    /// Print `err` on stderr in the program's style
    pub fn report_error(&self, err: &ToolkitError) {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        // Nothing sensible to do if stderr is gone
        let _ = self.write_error(err, &mut handle);
    }

    /// Write the message for `err`
    pub fn write_error(&self, err: &ToolkitError, out: &mut dyn Write) -> io::Result<()> {
        let s = &self.styling;
        let marker = s.error_marker("[ERROR]");
        let help_hint = format!(
            "Use {} for a list of available commands.",
            s.code(&format!("{} help", self.script_name()))
        );
        match err {
            ToolkitError::UnknownName(name) => {
                writeln!(out, "{} {} is not a recognized command name.", marker, s.code(name))?;
                writeln!(out, "{}", help_hint)
            }
            ToolkitError::NoCommand => {
                writeln!(out, "{} A command is required.", marker)?;
                writeln!(out, "{}", help_hint)
            }
            other => writeln!(out, "{} {}", marker, other),
        }
    }
}

/// Turn `cmd ... -h` and `cmd help` into `help cmd`
///
/// `-h` and `--help` count only before a `--`. Dashed built-ins are never
/// rewritten, so completion requests may carry help flags as words.
fn rewrite_help_request(name: &str, args: &[String]) -> (String, Vec<String>) {
    let mut args = args.to_vec();
    if name.starts_with('-') && is_reserved_name(name) {
        return (name.to_string(), args);
    }
    let wants_help = args.first().map(String::as_str) == Some("help")
        || args
            .iter()
            .take_while(|a| a.as_str() != "--")
            .any(|a| a == "-h" || a == "--help");
    if !wants_help {
        return (name.to_string(), args);
    }
    match args.first_mut() {
        Some(first) => *first = name.to_string(),
        None => args.push(name.to_string()),
    }
    ("help".to_string(), args)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
