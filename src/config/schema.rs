//! Configuration validation
//!
//! Checks a parsed configuration and turns command definitions into
//! positional-capture parsers.

use crate::config::types::{CommandConfig, Config, CountSpec};
use crate::error::{ConfigError, ConfigResult};
use crate::parser::{ArgMap, Cardinality, CaptureSink, CommandOptionParser, FlagSpec};
use crate::program::is_reserved_name;
use std::collections::HashSet;

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if let Some(interpreter) = &config.interpreter {
        if interpreter.is_empty() || interpreter[0].is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name a program".to_string(),
            ));
        }
    }

    for (name, command) in &config.commands {
        validate_command(name, command)?;
    }

    Ok(())
}

/// Validate a single command
pub fn validate_command(name: &str, command: &CommandConfig) -> ConfigResult<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!(
            "Invalid command name: '{}'",
            name
        )));
    }
    if is_reserved_name(name) {
        return Err(ConfigError::ReservedName(name.to_string()));
    }
    if command.raw && (!command.flags.is_empty() || command.positionals.is_some()) {
        return Err(ConfigError::Invalid(format!(
            "Command '{}' takes raw arguments and cannot declare flags or positionals",
            name
        )));
    }
    if let Some(positionals) = &command.positionals {
        if positionals.count.is_none() && positionals.explain.is_some() {
            return Err(ConfigError::Invalid(format!(
                "Command '{}' explains a positional count it does not set",
                name
            )));
        }
    }

    // Building the parser checks spellings, duplicates and counts
    build_parser(name, command).map(|_| ())
}

/// Build the parser for a non-raw command
pub fn build_parser(name: &str, command: &CommandConfig) -> ConfigResult<CommandOptionParser<ArgMap>> {
    let mut parser = CommandOptionParser::new();
    let mut seen = HashSet::new();
    let mut keys = HashSet::new();

    for entry in &command.flags {
        let mut spec = FlagSpec::from_spelling(entry.spelling()).map_err(|e| {
            ConfigError::InvalidFlag {
                command: name.to_string(),
                spelling: entry.spelling().to_string(),
                reason: e.to_string(),
            }
        })?;
        for flag_name in flag_names(&spec) {
            if !seen.insert(flag_name.clone()) {
                return Err(ConfigError::DuplicateFlag {
                    command: name.to_string(),
                    flag: flag_name,
                });
            }
        }
        // Flags without actions record under their key
        if !keys.insert(spec.key()) {
            return Err(ConfigError::DuplicateFlag {
                command: name.to_string(),
                flag: spec.key(),
            });
        }
        if let Some(usage) = entry.usage() {
            spec = spec.summary(usage);
        }
        parser.on(spec);
    }

    if let Some(positionals) = &command.positionals {
        if let Some(count) = &positionals.count {
            let rule = parse_count(name, count)?;
            match &positionals.explain {
                Some(text) => parser.expect_positional_cardinality_explained(rule, text),
                None => parser.expect_positional_cardinality(rule),
            };
        }
        if let Some(slot) = &positionals.slot {
            parser.capture_positionals(CaptureSink::slot(slot), false);
        }
    }

    Ok(parser)
}

/// Interpret a positional count
///
/// Accepts `N`, `lo..hi` (inclusive), `lo...hi` (end excluded) and the
/// named rules `even`, `odd` and `nonzero`.
pub fn parse_count(command: &str, count: &CountSpec) -> ConfigResult<Cardinality<ArgMap>> {
    let invalid = || ConfigError::InvalidCount {
        command: command.to_string(),
        count: count.to_string(),
    };

    let text = match count {
        CountSpec::Exact(n) => return Ok(Cardinality::Exact(*n)),
        CountSpec::Text(text) => text.trim(),
    };

    if let Ok(n) = text.parse::<usize>() {
        return Ok(Cardinality::Exact(n));
    }
    if let Some(rule) = Cardinality::named(text) {
        return Ok(rule);
    }

    let bound = |s: &str| s.trim().parse::<usize>().map_err(|_| invalid());
    if let Some((lo, hi)) = text.split_once("...") {
        let (lo, hi) = (bound(lo)?, bound(hi)?);
        if lo >= hi {
            return Err(invalid());
        }
        return Ok(Cardinality::from(lo..hi));
    }
    if let Some((lo, hi)) = text.split_once("..") {
        let (lo, hi) = (bound(lo)?, bound(hi)?);
        if lo > hi {
            return Err(invalid());
        }
        return Ok(Cardinality::Range(lo..=hi));
    }

    Err(invalid())
}

/// Literal names a flag answers to, both forms of a toggle included
fn flag_names(spec: &FlagSpec<ArgMap>) -> Vec<String> {
    spec.spellings()
        .into_iter()
        .flat_map(|s| match s.strip_prefix("--[no-]") {
            Some(name) => vec![format!("--{}", name), format!("--no-{}", name)],
            None => vec![s],
        })
        .collect()
}
