//! Shell line execution
//!
//! Run lines are interpolated and handed to the interpreter one at a time.

use crate::error::{ExecutionError, Result};
use crate::runner::{interpolate, interpolate_strict, Context};
use std::process::{Command as StdCommand, Stdio};

/// Execute one run line in the given context
pub fn execute_line(line: &str, ctx: &Context) -> Result<()> {
    let table = ctx.lookup_table();
    let exec_str = if ctx.strict {
        interpolate_strict(line, &table)?
    } else {
        interpolate(line, &table)?
    };

    ctx.print_run(&exec_str);

    let mut command = interpreter_command(ctx)?;
    command.arg(&exec_str);
    command.current_dir(&ctx.working_dir);

    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    for (key, value) in &table {
        command.env(key, value);
    }

    let status = command.status().map_err(|e| ExecutionError::Spawn {
        program: ctx.interpreter.first().cloned().unwrap_or_default(),
        error: e.to_string(),
    })?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed(status.code()).into());
    }

    Ok(())
}

/// Execute run lines in order, stopping at the first failure
pub fn execute_lines<S: AsRef<str>>(lines: &[S], ctx: &Context) -> Result<()> {
    for line in lines {
        execute_line(line.as_ref(), ctx)?;
    }
    Ok(())
}

fn interpreter_command(ctx: &Context) -> Result<StdCommand> {
    let (program, args) = ctx
        .interpreter
        .split_first()
        .ok_or(ExecutionError::NoInterpreter)?;

    let mut command = StdCommand::new(program);
    command.args(args);
    Ok(command)
}
