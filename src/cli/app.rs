//! Main CLI application

use crate::config::{load_env_file, parse_config_auto, parse_config_file, validate_config, Config};
use crate::error::{Result, ToolkitError};
use crate::program::Program;
use crate::runner::{build_program, Context, Verbosity};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// CLI application: a program built from a toolkit.yml file
pub struct App {
    /// Program assembled from the configuration
    program: Program,
    /// Config file path
    config_path: PathBuf,
}

impl App {
    /// Create a new app from the discovered configuration file
    pub fn new(verbosity: Verbosity) -> Result<Self> {
        let (config, config_path) = parse_config_auto()?;
        Self::from_config(config, config_path, verbosity)
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf, verbosity: Verbosity) -> Result<Self> {
        let config = parse_config_file(&path)?;
        Self::from_config(config, path, verbosity)
    }

    fn from_config(config: Config, config_path: PathBuf, verbosity: Verbosity) -> Result<Self> {
        validate_config(&config)?;

        let ctx = Context::new()
            .with_config_path(config_path.clone())
            .with_env_file(load_env_file(&config_path)?)
            .with_verbosity(verbosity);
        ctx.print_debug(&format!("Using config file: {}", config_path.display()));

        let program = build_program(&config, ctx)?;
        Ok(App {
            program,
            config_path,
        })
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Run the program and return the process exit status
    pub fn run(&self, argv: &[String]) -> i32 {
        self.program.execute(argv)
    }
}

/// Build the clap command for the host binary
///
/// Help and version flags are left to the program so that `-h`, `--help`,
/// `--commands` and friends reach it as trailing arguments.
pub fn build_cli() -> Command {
    Command::new("toolkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run the commands defined in toolkit.yml")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to toolkit.yml config file"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("args")
                .value_name("ARGS")
                .help("Command name and its arguments")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .action(ArgAction::Append),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Arguments meant for the program
fn program_args(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("args")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Run the CLI application with the process arguments
pub fn run() -> i32 {
    run_from(env::args_os())
}

/// Run the CLI application with provided arguments
pub fn run_from<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match build_cli().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };

    let verbosity = get_verbosity(&matches);
    let app = match matches.get_one::<PathBuf>("file") {
        Some(path) => App::with_config_file(path.clone(), verbosity),
        None => App::new(verbosity),
    };

    match app {
        Ok(app) => app.run(&program_args(&matches)),
        Err(e) => {
            report_startup_error(&e, verbosity);
            e.exit_code()
        }
    }
}

fn report_startup_error(err: &ToolkitError, verbosity: Verbosity) {
    Context::new().with_verbosity(verbosity).print_error(&err.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn matches(args: &[&str]) -> ArgMatches {
        build_cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_get_verbosity_normal() {
        assert_eq!(get_verbosity(&matches(&["toolkit"])), Verbosity::Normal);
        assert_eq!(get_verbosity(&matches(&["toolkit", "-v"])), Verbosity::Verbose);
        assert_eq!(get_verbosity(&matches(&["toolkit", "-q"])), Verbosity::Quiet);
        assert_eq!(get_verbosity(&matches(&["toolkit", "-s"])), Verbosity::Silent);
    }

    #[test]
    fn test_file_argument() {
        let m = matches(&["toolkit", "-f", "other.yml", "build"]);
        assert_eq!(m.get_one::<PathBuf>("file"), Some(&PathBuf::from("other.yml")));
        assert_eq!(program_args(&m), vec!["build"]);
    }

    #[test]
    fn test_trailing_arguments_pass_through() {
        let m = matches(&["toolkit", "greet", "-m", "hi", "-q"]);
        assert_eq!(program_args(&m), vec!["greet", "-m", "hi", "-q"]);
        assert_eq!(get_verbosity(&m), Verbosity::Normal);
    }

    #[test]
    fn test_help_flags_reach_the_program() {
        let m = matches(&["toolkit", "--help"]);
        assert_eq!(program_args(&m), vec!["--help"]);

        let m = matches(&["toolkit", "--flag-completion", "toolkit", "greet", "--m"]);
        assert_eq!(
            program_args(&m),
            vec!["--flag-completion", "toolkit", "greet", "--m"]
        );
    }

    #[test]
    fn test_app_from_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("toolkit.yml");
        fs::write(
            &path,
            "title: Test Tools\ncommands:\n  hello:\n    usage: Say hello\n    run: \"true\"\n",
        )
        .unwrap();

        let app = App::with_config_file(path.clone(), Verbosity::Silent).unwrap();
        assert_eq!(app.config_path(), &path);
        assert_eq!(app.program().title(), "Test Tools");
        assert!(app.program().find("hello").is_some());
        assert_eq!(app.run(&["hello".to_string()]), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("toolkit.yml");
        fs::write(&path, "commands:\n  help:\n    run: \"true\"\n").unwrap();

        assert!(App::with_config_file(path, Verbosity::Silent).is_err());
    }
}
