//! Programs assembled from YAML command definitions
//!
//! Each configured command becomes a program command whose handler turns
//! the parsed flags and positionals into variables and runs its lines.

use crate::config::{build_parser, CommandConfig, Config};
use crate::error::Result;
use crate::parser::{ArgMap, Arity, CommandOptionParser};
use crate::program::{Command, Invocation, Program};
use crate::runner::{execute_lines, Context};
use std::collections::HashMap;
use std::sync::Arc;

/// Run lines of one configured command
#[derive(Debug, Clone)]
pub struct ScriptCommand {
    name: String,
    lines: Vec<String>,
    defaults: Vec<(String, String)>,
    slot: Option<String>,
}

impl ScriptCommand {
    pub fn new(
        name: &str,
        config: &CommandConfig,
        parser: Option<&CommandOptionParser<ArgMap>>,
    ) -> Self {
        let defaults = parser
            .map(|p| {
                p.flags()
                    .flags()
                    .iter()
                    .map(|spec| (spec.key(), unset_value(spec.arity())))
                    .collect()
            })
            .unwrap_or_default();

        ScriptCommand {
            name: name.to_string(),
            lines: config.run.clone(),
            defaults,
            slot: config.positionals.as_ref().and_then(|p| p.slot.clone()),
        }
    }

    /// Variables for one invocation
    ///
    /// Every declared flag is present: switches as `true`/`false`, value
    /// flags as their text (empty when not given). Positionals appear as
    /// `args`, `arg1..argN` and under the slot name.
    pub fn variables(&self, flags: Option<&ArgMap>, positionals: &[String]) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = self.defaults.iter().cloned().collect();

        if let Some(flags) = flags {
            for (name, value) in flags.flags() {
                vars.insert(name.to_string(), value.to_string());
            }
        }

        for (i, arg) in positionals.iter().enumerate() {
            vars.insert(format!("arg{}", i + 1), arg.clone());
        }

        let joined = positionals.join(" ");
        if let Some(slot) = &self.slot {
            vars.insert(slot.clone(), joined.clone());
        }
        vars.insert("args".to_string(), joined);

        vars
    }

    /// Run every line with `vars` layered over the context's own
    pub fn run(&self, vars: HashMap<String, String>, ctx: &Context) -> Result<()> {
        ctx.print_command_start(&self.name);

        let mut ctx = ctx.clone();
        ctx.vars.extend(vars);
        execute_lines(&self.lines, &ctx)
    }
}

fn unset_value(arity: &Arity) -> String {
    match arity {
        Arity::None => "false".to_string(),
        Arity::Required(_) | Arity::Optional(_) => String::new(),
    }
}

/// Build a program from a validated configuration
pub fn build_program(config: &Config, ctx: Context) -> Result<Program> {
    let ctx = match &config.interpreter {
        Some(interpreter) => ctx.with_interpreter(interpreter.clone()),
        None => ctx,
    };
    let strict = ctx.strict || config.strict;
    let ctx = Arc::new(ctx.with_strict(strict));

    let mut program = Program::new();
    if let Some(title) = &config.title {
        program = program.with_title(title);
    }

    for (name, command_config) in &config.commands {
        ctx.print_debug(&format!("Registering command: {}", name));
        program.register(build_command(name, command_config, Arc::clone(&ctx))?)?;
    }

    Ok(program)
}

fn build_command(name: &str, config: &CommandConfig, ctx: Arc<Context>) -> Result<Command> {
    let command = if config.raw {
        let script = ScriptCommand::new(name, config, None);
        Command::raw(name, move |inv: Invocation<Vec<String>>| {
            let vars = script.variables(None, &inv.positionals);
            script.run(vars, &ctx).map_err(anyhow::Error::new)
        })
    } else {
        let parser = build_parser(name, config)?;
        let script = ScriptCommand::new(name, config, Some(&parser));
        Command::parsing(name, parser, move |inv: Invocation<ArgMap>| {
            let vars = script.variables(Some(&inv.args), &inv.positionals);
            script.run(vars, &ctx).map_err(anyhow::Error::new)
        })
    };

    let command = match &config.usage {
        Some(usage) => command.usage(usage),
        None => command,
    };
    Ok(match &config.description {
        Some(description) => command.description(description),
        None => command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::error::{ExecutionError, InterpolationError, ToolkitError};
    use crate::runner::interpolate;
    use crate::program::HelpStyling;
    use crate::runner::Verbosity;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
title: Demo Toolkit
commands:
  greet:
    usage: Say hello
    flags:
      - spec: "-m, --message MESSAGE"
        usage: What to say
      - "--[no-]shout"
    positionals:
      count: "1..2"
      slot: names
    run: echo "${message}|${shout}|${names}|${arg1}|${arg2}" > out.txt
  passthrough:
    raw: true
    run:
      - echo "${args}" > raw.txt
  literal:
    raw: true
    run:
      - printf '%s' '${args}' > literal.txt
  broken:
    usage: Always fails
    run:
      - exit 4
"#;

    fn setup() -> (TempDir, Program) {
        let dir = TempDir::new().unwrap();
        let config = parse_config(CONFIG).unwrap();
        let ctx = Context::new()
            .with_working_dir(dir.path().to_path_buf())
            .with_verbosity(Verbosity::Silent);
        let program = build_program(&config, ctx)
            .unwrap()
            .with_script_name("demo")
            .with_styling(HelpStyling::plain());
        (dir, program)
    }

    fn read(dir: &TempDir, file: &str) -> String {
        fs::read_to_string(dir.path().join(file)).unwrap().trim_end().to_string()
    }

    #[test]
    fn test_flags_and_positionals_become_variables() {
        let (dir, program) = setup();
        program
            .run_with_output(&["greet", "-m", "hi", "--shout", "ann", "bob"], &mut io::sink())
            .unwrap();
        assert_eq!(read(&dir, "out.txt"), "hi|true|ann bob|ann|bob");
    }

    #[test]
    fn test_unset_flags_have_defaults() {
        let (dir, program) = setup();
        program
            .run_with_output(&["greet", "ann"], &mut io::sink())
            .unwrap();
        assert_eq!(read(&dir, "out.txt"), "|false|ann|ann|");
    }

    #[test]
    fn test_negated_toggle() {
        let (dir, program) = setup();
        program
            .run_with_output(&["greet", "--no-shout", "ann"], &mut io::sink())
            .unwrap();
        assert_eq!(read(&dir, "out.txt"), "|false|ann|ann|");
    }

    #[test]
    fn test_raw_command_sees_everything() {
        let (dir, program) = setup();
        program
            .run_with_output(&["passthrough", "--anything", "goes"], &mut io::sink())
            .unwrap();
        assert_eq!(read(&dir, "raw.txt"), "--anything goes");
    }

    #[test]
    fn test_count_is_enforced_before_running() {
        let (dir, program) = setup();
        let err = program
            .run_with_output(&["greet", "a", "b", "c"], &mut io::sink())
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!dir.path().join("out.txt").exists());
    }

    #[test]
    fn test_failed_line_status_passes_through() {
        let (_dir, program) = setup();
        let err = program
            .run_with_output(&["broken"], &mut io::sink())
            .unwrap_err();
        assert!(matches!(
            err,
            ToolkitError::Execution(ExecutionError::CommandFailed(Some(4)))
        ));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_title_usage_and_listing() {
        let (_dir, program) = setup();
        assert_eq!(program.title(), "Demo Toolkit");

        let mut out = Vec::new();
        program.run_with_output(&["--commands"], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "broken greet help\n");
    }

    #[test]
    fn test_arguments_containing_placeholders_stay_literal() {
        let (dir, program) = setup();
        program
            .run_with_output(&["literal", "${HOME}", "${arg1}"], &mut io::sink())
            .unwrap();
        assert_eq!(read(&dir, "literal.txt"), "${HOME} ${arg1}");

        let script = ScriptCommand::new("plain", &CommandConfig::default(), None);
        let vars = script.variables(None, &["${HOME}".to_string(), "${arg1}".to_string()]);
        assert_eq!(interpolate("${args}", &vars).unwrap(), "${HOME} ${arg1}");
        assert_eq!(interpolate("${arg2}", &vars).unwrap(), "${arg1}");
    }

    #[test]
    fn test_strict_config_rejects_undefined_variables() {
        let yaml = r#"
strict: true
commands:
  typo:
    run: touch "${nmae}" ran
"#;
        let dir = TempDir::new().unwrap();
        let config = parse_config(yaml).unwrap();
        let ctx = Context::new()
            .with_working_dir(dir.path().to_path_buf())
            .with_verbosity(Verbosity::Silent);
        let program = build_program(&config, ctx).unwrap();

        let err = program
            .run_with_output(&["typo"], &mut io::sink())
            .unwrap_err();
        assert!(matches!(
            err,
            ToolkitError::Interpolation(InterpolationError::UndefinedVariable(ref name))
                if name == "nmae"
        ));
        assert!(!dir.path().join("ran").exists());
    }

    #[test]
    fn test_variables_without_slot() {
        let config = CommandConfig::default();
        let script = ScriptCommand::new("plain", &config, None);
        let vars = script.variables(None, &["x".to_string()]);
        assert_eq!(vars["args"], "x");
        assert_eq!(vars["arg1"], "x");
        assert_eq!(vars.len(), 2);
    }
}
