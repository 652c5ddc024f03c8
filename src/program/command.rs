//! Commands and their bodies

use crate::completion::{generate, Completion};
use crate::error::{Result, ToolkitError};
use crate::parser::{ArgumentDestination, CommandOptionParser};
use crate::program::help::ParserHelp;
use std::fmt;

/// Everything a handler gets for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<D> {
    /// Name the command was invoked under
    pub command: String,
    /// The destination the command line was parsed into
    pub args: D,
    /// Positionals in encounter order, after mapping
    pub positionals: Vec<String>,
}

/// Result type for command handlers
pub type HandlerResult = anyhow::Result<()>;

/// Runs a command from its argument list
pub trait CommandBody: Send + Sync {
    /// Parse `args` as needed and run the handler
    fn invoke(&self, command: &str, args: Vec<String>) -> Result<()>;

    /// Parser details for help; `None` when arguments are taken raw
    fn help(&self) -> Option<ParserHelp> {
        None
    }

    /// Flag completion; `None` when the command has nothing to offer
    fn complete(&self, _preceding: &[String], _in_progress: &str) -> Option<Completion> {
        None
    }
}

struct RawBody<F> {
    handler: F,
}

impl<F> CommandBody for RawBody<F>
where
    F: Fn(Invocation<Vec<String>>) -> HandlerResult + Send + Sync,
{
    fn invoke(&self, command: &str, args: Vec<String>) -> Result<()> {
        let invocation = Invocation {
            command: command.to_string(),
            positionals: args.clone(),
            args,
        };
        (self.handler)(invocation).map_err(handler_error)
    }
}

struct ParsingBody<D, F> {
    parser: CommandOptionParser<D>,
    handler: F,
}

impl<D, F> CommandBody for ParsingBody<D, F>
where
    D: ArgumentDestination,
    F: Fn(Invocation<D>) -> HandlerResult + Send + Sync,
{
    fn invoke(&self, command: &str, args: Vec<String>) -> Result<()> {
        let mut dest = D::default();
        let positionals = self.parser.parse(&args, &mut dest)?;
        let invocation = Invocation {
            command: command.to_string(),
            args: dest,
            positionals,
        };
        (self.handler)(invocation).map_err(handler_error)
    }

    fn help(&self) -> Option<ParserHelp> {
        Some(ParserHelp::of(&self.parser))
    }

    fn complete(&self, preceding: &[String], in_progress: &str) -> Option<Completion> {
        Some(generate(&self.parser, preceding, in_progress))
    }
}

/// Recover toolkit errors a handler passed through `anyhow`
fn handler_error(err: anyhow::Error) -> ToolkitError {
    match err.downcast::<ToolkitError>() {
        Ok(toolkit) => toolkit,
        Err(other) => ToolkitError::Command(other),
    }
}

/// A named command of a program
pub struct Command {
    name: String,
    usage: Option<String>,
    description: Option<String>,
    body: Box<dyn CommandBody>,
}

impl Command {
    /// A command whose handler sees the arguments untouched
    pub fn raw<F>(name: &str, handler: F) -> Self
    where
        F: Fn(Invocation<Vec<String>>) -> HandlerResult + Send + Sync + 'static,
    {
        Self::with_body(name, RawBody { handler })
    }

    /// A command whose arguments go through `parser` first
    pub fn parsing<D, F>(name: &str, parser: CommandOptionParser<D>, handler: F) -> Self
    where
        D: ArgumentDestination + 'static,
        F: Fn(Invocation<D>) -> HandlerResult + Send + Sync + 'static,
    {
        Self::with_body(name, ParsingBody { parser, handler })
    }

    /// A command that accepts no arguments at all
    pub fn without_args<F>(name: &str, handler: F) -> Self
    where
        F: Fn() -> HandlerResult + Send + Sync + 'static,
    {
        let mut parser = CommandOptionParser::<Vec<String>>::new();
        parser.no_positional_args();
        Self::parsing(name, parser, move |_| handler())
    }

    /// A command with a custom body
    pub fn with_body<B: CommandBody + 'static>(name: &str, body: B) -> Self {
        Command {
            name: name.to_string(),
            usage: None,
            description: None,
            body: Box::new(body),
        }
    }

    /// One-line summary; commands with one are listed in help and completion
    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    /// Longer text shown in the command's own help
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage_text(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn is_listable(&self) -> bool {
        self.usage.as_deref().map_or(false, |u| !u.is_empty())
    }

    /// Usage and description together
    pub fn full_description(&self) -> String {
        match (&self.usage, &self.description) {
            (Some(usage), Some(desc)) => format!("{}\n\n{}", usage, desc.trim_end()),
            (Some(usage), None) => usage.clone(),
            (None, Some(desc)) => desc.trim_end().to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn body(&self) -> &dyn CommandBody {
        self.body.as_ref()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .finish()
    }
}
