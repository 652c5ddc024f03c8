//! Argument destinations
//!
//! A destination receives flag values and captured positionals during a
//! parse, and is handed to the command handler afterwards.

use crate::parser::FlagValue;
use std::collections::BTreeMap;

/// Something a parse can accumulate into
///
/// `Default` supplies the scratch destination used by completion trial
/// parses, so the live one is never touched.
pub trait ArgumentDestination: Default {
    /// Store the value of a flag that has no action of its own
    fn record_flag(&mut self, _name: &str, _value: FlagValue) {}

    /// Sequence that receives positionals for a capture key
    ///
    /// `None` is the default sequence. Destinations without a place for the
    /// key return `None` and positionals are not captured.
    fn capture_slot(&mut self, _key: Option<&str>) -> Option<&mut Vec<String>> {
        None
    }
}

/// General-purpose destination: flag values by name, positionals by slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgMap {
    flags: BTreeMap<String, FlagValue>,
    captured: BTreeMap<Option<String>, Vec<String>>,
}

impl ArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// Text value of a flag, if it was given one
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FlagValue::as_str)
    }

    /// Whether a flag was given and is on
    pub fn is_on(&self, name: &str) -> bool {
        self.get(name).map(FlagValue::as_bool).unwrap_or(false)
    }

    pub fn insert_flag(&mut self, name: &str, value: FlagValue) {
        self.flags.insert(name.to_string(), value);
    }

    pub fn flags(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Positionals in the default sequence, if any were captured there
    pub fn positionals(&self) -> Option<&[String]> {
        self.captured.get(&None).map(Vec::as_slice)
    }

    /// Positionals captured under a named slot
    pub fn slot(&self, key: &str) -> Option<&[String]> {
        self.captured
            .get(&Some(key.to_string()))
            .map(Vec::as_slice)
    }
}

impl ArgumentDestination for ArgMap {
    fn record_flag(&mut self, name: &str, value: FlagValue) {
        self.insert_flag(name, value);
    }

    fn capture_slot(&mut self, key: Option<&str>) -> Option<&mut Vec<String>> {
        Some(self.captured.entry(key.map(str::to_string)).or_default())
    }
}

/// A bare list: the default sequence is the list itself, flags are dropped
impl ArgumentDestination for Vec<String> {
    fn capture_slot(&mut self, key: Option<&str>) -> Option<&mut Vec<String>> {
        match key {
            None => Some(self),
            Some(_) => None,
        }
    }
}
