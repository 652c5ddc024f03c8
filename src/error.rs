//! Error types for toolkit programs

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for toolkit program operations
pub type Result<T> = std::result::Result<T, ToolkitError>;

/// Main error type for toolkit programs
#[derive(Error, Debug)]
pub enum ToolkitError {
    /// The first argument does not name a registered command
    #[error("The command '{0}' is not known")]
    UnknownName(String),

    /// No arguments at all were given
    #[error("A command is required")]
    NoCommand,

    /// A handler rejected its command line
    #[error("{0}")]
    InvalidCommandLine(String),

    /// Flag scanning or positional policy failure
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Failure returned by a command handler
    #[error(transparent)]
    Command(#[from] anyhow::Error),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shell command execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ToolkitError {
    /// Process exit status this error maps to
    ///
    /// Anything wrong with the command line itself exits with 2; a failed
    /// shell command passes its own status through.
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolkitError::UnknownName(_)
            | ToolkitError::NoCommand
            | ToolkitError::InvalidCommandLine(_)
            | ToolkitError::Parse(_) => 2,
            ToolkitError::Execution(ExecutionError::CommandFailed(Some(code))) if *code > 0 => {
                *code
            }
            _ => 1,
        }
    }
}

/// Errors reported by the flag scanner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("ambiguous option: {0}")]
    AmbiguousOption(String),

    #[error("missing argument: {0}")]
    MissingArgument(String),

    #[error("needless argument: {0}")]
    NeedlessArgument(String),

    #[error("invalid argument: {flag} ({reason})")]
    InvalidArgument { flag: String, reason: String },

    #[error("malformed flag specification '{spelling}': {reason}")]
    BadSpelling { spelling: String, reason: String },
}

/// Errors from a positional-capture parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The flag scanner rejected the command line
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The positional count does not satisfy the cardinality rule
    #[error("{}", wrong_count_message(.expected, .actual))]
    WrongArgumentCount { expected: Expectation, actual: usize },

    /// A cardinality predicate could not be evaluated
    #[error("positional argument rule failed: {0}")]
    Rule(String),
}

impl ParseError {
    /// True when the scanner reported a flag still waiting for its value
    pub fn is_missing_argument(&self) -> bool {
        matches!(self, ParseError::Scan(ScanError::MissingArgument(_)))
    }
}

/// Shape of a cardinality rule, carried by count violations for messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Exact(usize),
    Range { lo: usize, hi: usize },
    Rule,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Exact(n) => write!(f, "{}", n),
            Expectation::Range { lo, hi } => write!(f, "{}..{} (inclusive)", lo, hi),
            Expectation::Rule => f.write_str("a rule"),
        }
    }
}

fn wrong_count_message(expected: &Expectation, actual: &usize) -> String {
    match expected {
        Expectation::Rule => format!("{} arguments given", actual),
        _ => format!("expected {} arguments, got {}", expected, actual),
    }
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Command '{command}' has a bad flag '{spelling}': {reason}")]
    InvalidFlag {
        command: String,
        spelling: String,
        reason: String,
    },

    #[error("Command '{command}' has an invalid positional count '{count}'")]
    InvalidCount { command: String, count: String },

    #[error("Flag '{flag}' is defined more than once in command '{command}'")]
    DuplicateFlag { command: String, flag: String },

    #[error("Command name '{0}' is reserved")]
    ReservedName(String),

    #[error("Failed to load environment file '{path}': {error}")]
    EnvFile { path: PathBuf, error: String },
}

/// Shell command execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command failed with exit code {0:?}")]
    CommandFailed(Option<i32>),

    #[error("Failed to start interpreter '{program}': {error}")]
    Spawn { program: String, error: String },

    #[error("No interpreter configured")]
    NoInterpreter,
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("Invalid variable pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

/// Specialized result type for positional-capture parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Build the error a handler returns to reject its command line
///
/// The program maps it back to [`ToolkitError::InvalidCommandLine`], so it
/// exits with status 2 like any other usage error.
pub fn invalid_args(message: impl Into<String>) -> anyhow::Error {
    anyhow::Error::new(ToolkitError::InvalidCommandLine(message.into()))
}
