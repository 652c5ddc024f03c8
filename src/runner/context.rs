//! Execution context for running command scripts
//!
//! The context carries everything run lines need besides the parsed
//! arguments: where to run, which interpreter, extra environment and how
//! chatty to be.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Execution context shared by every command of a program
#[derive(Debug, Clone)]
pub struct Context {
    /// Current working directory
    pub working_dir: PathBuf,

    /// Configuration file path
    pub config_path: Option<PathBuf>,

    /// Variables for interpolation (flags, positionals)
    pub vars: HashMap<String, String>,

    /// Variables loaded from the environment file
    pub env_file: Vec<(String, String)>,

    /// Interpreter run lines are passed to (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Reject run lines that reference undefined variables
    pub strict: bool,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_path: None,
            vars: HashMap::new(),
            env_file: Vec::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
            strict: false,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the configuration file path
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set variables
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Set variables loaded from an environment file
    pub fn with_env_file(mut self, vars: Vec<(String, String)>) -> Self {
        self.env_file = vars;
        self
    }

    /// Set a single variable
    pub fn set_var(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    /// Get a variable value
    pub fn get_var(&self, key: &str) -> Option<&String> {
        self.vars.get(key)
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set strict interpolation
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Everything interpolation may draw on: environment file entries,
    /// overridden by invocation variables
    pub fn lookup_table(&self) -> HashMap<String, String> {
        let mut table: HashMap<String, String> = self.env_file.iter().cloned().collect();
        table.extend(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        table
    }

    /// Get the directory for the config file (or current dir)
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| self.working_dir.clone())
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("[DEBUG] {}", message);
        }
    }

    /// Echo a run line before executing it
    pub fn print_run(&self, line: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("[RUN] {}", line);
        }
    }

    /// Print command start message
    pub fn print_command_start(&self, name: &str) {
        self.print_debug(&format!("Running command: {}", name));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
