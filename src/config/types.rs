//! Core configuration types
//!
//! This module defines the data structures that represent a toolkit.yml file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Title shown at the top of help (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Interpreter used for run lines (e.g., ["bash", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Fail on `${var}` references in run lines that nothing defines
    #[serde(default)]
    pub strict: bool,

    /// Commands by name
    #[serde(default)]
    pub commands: BTreeMap<String, CommandConfig>,
}

/// A command definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// One-line summary; commands without one are hidden from listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Longer description for the command's own help
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hand the arguments to the run lines without parsing them
    #[serde(default)]
    pub raw: bool,

    /// Flags the command accepts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagEntry>,

    /// Positional argument policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positionals: Option<PositionalConfig>,

    /// Shell lines to execute
    #[serde(default, deserialize_with = "deserialize_run_lines")]
    pub run: Vec<String>,
}

/// A flag given either as a bare spelling or with details
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FlagEntry {
    /// Just the spelling, e.g. `--verbose`
    Spelling(String),

    /// Spelling plus help text
    Detailed(FlagConfig),
}

impl FlagEntry {
    pub fn spelling(&self) -> &str {
        match self {
            FlagEntry::Spelling(s) => s,
            FlagEntry::Detailed(detail) => &detail.spec,
        }
    }

    pub fn usage(&self) -> Option<&str> {
        match self {
            FlagEntry::Spelling(_) => None,
            FlagEntry::Detailed(detail) => detail.usage.as_deref(),
        }
    }
}

/// Detailed flag specification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlagConfig {
    /// Classic spelling, e.g. `-m, --message MESSAGE` or `--[no-]color`
    pub spec: String,

    /// Help text for the flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

/// How many positionals a command takes and where they go
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PositionalConfig {
    /// Integer, `lo..hi`, `lo...hi` or a named rule (`even`, `odd`, `nonzero`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<CountSpec>,

    /// Sentence for help replacing the generated one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,

    /// Variable name the positionals are also exposed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

/// Positional count as written in YAML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CountSpec {
    Exact(usize),
    Text(String),
}

impl std::fmt::Display for CountSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountSpec::Exact(n) => write!(f, "{}", n),
            CountSpec::Text(s) => f.write_str(s),
        }
    }
}

/// Accept a single run line or a list of them
fn deserialize_run_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(D::Error::custom("run lines must be strings")),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string or array")),
    }
}
