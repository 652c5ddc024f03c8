//! Variable interpolation for run lines
//!
//! Replaces `${var}` with values from the invocation, falling back to the
//! process environment.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::HashMap;
use std::env;

const VARIABLE_PATTERN: &str = r"\$\{([^}]+)\}";

/// Interpolate variables in a string
///
/// Supports:
/// - `${var}` - variable from the table
/// - Environment variables (when not found in the table)
///
/// Substitution is a single pass: values are inserted as they are, so an
/// argument containing `${...}` is never expanded again. Unknown variables
/// are left in place for the shell to see.
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    let re = Regex::new(VARIABLE_PATTERN)?;

    let result = re.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[1];
        match vars.get(var_name) {
            Some(value) => value.clone(),
            None => env::var(var_name).unwrap_or_else(|_| caps[0].to_string()),
        }
    });

    Ok(result.into_owned())
}

/// Interpolate with strict mode - errors on undefined variables
///
/// Only the template is checked; inserted values may contain anything.
pub fn interpolate_strict(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    let re = Regex::new(VARIABLE_PATTERN)?;
    for caps in re.captures_iter(s) {
        let var_name = &caps[1];
        if !vars.contains_key(var_name) && env::var(var_name).is_err() {
            return Err(InterpolationError::UndefinedVariable(var_name.to_string()));
        }
    }

    interpolate(s, vars)
}
