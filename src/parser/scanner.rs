//! Flag scanner
//!
//! Recognizes `--flag`, `--flag=value`, `-f value`, clustered short switches,
//! `--[no-]flag` toggles and unique abbreviations of long names. Flag
//! recognition stops at a literal `--`.

use crate::error::ScanError;
use crate::parser::ArgumentDestination;
use std::fmt;
use std::sync::Arc;

/// Callback run with the destination each time a flag occurs
pub type FlagAction<D> = Arc<dyn Fn(&mut D, FlagValue) -> Result<(), String> + Send + Sync>;

/// Value produced by one occurrence of a flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// A switch, a toggle, or an optional value that was not supplied
    Switch(bool),
    /// A value given inline or in the following token
    Text(String),
}

impl FlagValue {
    /// Truthiness: a text value counts as on
    pub fn as_bool(&self) -> bool {
        match self {
            FlagValue::Switch(on) => *on,
            FlagValue::Text(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Switch(_) => None,
            FlagValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Switch(on) => write!(f, "{}", on),
            FlagValue::Text(s) => f.write_str(s),
        }
    }
}

/// How many values a flag takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arity {
    None,
    /// Takes a value, named by the placeholder in help
    Required(String),
    /// Takes a value only when one is attached or the next token is not a flag
    Optional(String),
}

/// A registered flag
pub struct FlagSpec<D> {
    longs: Vec<String>,
    shorts: Vec<char>,
    toggle: bool,
    arity: Arity,
    summary: Option<String>,
    action: Option<FlagAction<D>>,
}

impl<D> FlagSpec<D> {
    /// An empty flag; add names with [`long`](Self::long) and [`short`](Self::short)
    pub fn new() -> Self {
        FlagSpec {
            longs: Vec::new(),
            shorts: Vec::new(),
            toggle: false,
            arity: Arity::None,
            summary: None,
            action: None,
        }
    }

    /// A value-less switch with one long name
    pub fn switch(name: &str) -> Self {
        Self::new().long(name)
    }

    /// An on/off toggle spelled `--[no-]name`
    pub fn toggle(name: &str) -> Self {
        Self::new().long(name).negatable()
    }

    /// Parse a classic flag spelling such as `-m, --message MESSAGE`,
    /// `--level [LEVEL]`, `--out=FILE` or `--[no-]color`
    pub fn from_spelling(spelling: &str) -> Result<Self, ScanError> {
        let bad = |reason: &str| ScanError::BadSpelling {
            spelling: spelling.to_string(),
            reason: reason.to_string(),
        };

        let mut spec = Self::new();
        for part in spelling.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let mut words = part.split_whitespace();
            let form = words.next().ok_or_else(|| bad("empty flag"))?;
            let placeholder = words.next();
            if words.next().is_some() {
                return Err(bad("too many words"));
            }

            let (form, attached) = match form.split_once("[=") {
                Some((f, rest)) => (f, Some(Arity::Optional(rest.trim_end_matches(']').to_string()))),
                None => match form.split_once('=') {
                    Some((f, rest)) => (f, Some(Arity::Required(rest.to_string()))),
                    None => (form, None),
                },
            };

            if let Some(name) = form.strip_prefix("--[no-]") {
                if name.is_empty() {
                    return Err(bad("toggle needs a name"));
                }
                spec.longs.push(name.to_string());
                spec.toggle = true;
            } else if let Some(name) = form.strip_prefix("--") {
                if name.is_empty() {
                    return Err(bad("long flag needs a name"));
                }
                spec.longs.push(name.to_string());
            } else if let Some(letter) = form.strip_prefix('-') {
                let mut chars = letter.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '-' => spec.shorts.push(c),
                    _ => return Err(bad("short flag must be a single letter")),
                }
            } else {
                return Err(bad("flags start with '-'"));
            }

            let arity = match (attached, placeholder) {
                (Some(_), Some(_)) => return Err(bad("value given twice")),
                (Some(arity), None) => Some(arity),
                (None, Some(p)) => match p.strip_prefix('[').and_then(|p| p.strip_suffix(']')) {
                    Some(inner) => Some(Arity::Optional(inner.to_string())),
                    None => Some(Arity::Required(p.to_string())),
                },
                (None, None) => None,
            };
            if let Some(arity) = arity {
                spec.arity = arity;
            }
        }

        if spec.longs.is_empty() && spec.shorts.is_empty() {
            return Err(bad("no flag names"));
        }
        if spec.toggle && spec.arity != Arity::None {
            return Err(bad("a toggle cannot take a value"));
        }
        Ok(spec)
    }

    pub fn long(mut self, name: &str) -> Self {
        self.longs.push(name.to_string());
        self
    }

    pub fn short(mut self, letter: char) -> Self {
        self.shorts.push(letter);
        self
    }

    /// Require a value
    pub fn value(mut self, placeholder: &str) -> Self {
        self.arity = Arity::Required(placeholder.to_string());
        self
    }

    /// Accept an optional value
    pub fn optional_value(mut self, placeholder: &str) -> Self {
        self.arity = Arity::Optional(placeholder.to_string());
        self
    }

    /// Also accept `--no-<name>` for every long name
    pub fn negatable(mut self) -> Self {
        self.toggle = true;
        self
    }

    /// One-line description shown in help
    pub fn summary(mut self, text: &str) -> Self {
        self.summary = Some(text.to_string());
        self
    }

    /// Run `action` for each occurrence instead of recording the value
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut D, FlagValue) -> Result<(), String> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Name the value is recorded under when there is no action
    pub fn key(&self) -> String {
        match self.longs.first() {
            Some(long) => long.clone(),
            None => self.shorts.first().map(char::to_string).unwrap_or_default(),
        }
    }

    pub fn arity(&self) -> &Arity {
        &self.arity
    }

    pub fn is_toggle(&self) -> bool {
        self.toggle
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Spellings in registration order: `-m`, `--message`, `--[no-]color`
    pub fn spellings(&self) -> Vec<String> {
        let shorts = self.shorts.iter().map(|c| format!("-{}", c));
        let longs = self.longs.iter().map(|l| {
            if self.toggle {
                format!("--[no-]{}", l)
            } else {
                format!("--{}", l)
            }
        });
        shorts.chain(longs).collect()
    }

    /// Help column text, e.g. `-m, --message MESSAGE`
    pub fn help_spelling(&self) -> String {
        let names = self.spellings().join(", ");
        match &self.arity {
            Arity::None => names,
            Arity::Required(p) => format!("{} {}", names, p),
            Arity::Optional(p) => format!("{} [{}]", names, p),
        }
    }

    /// Concrete long forms without the leading dashes, with the negation flag
    fn long_forms(&self) -> impl Iterator<Item = (String, bool)> + '_ {
        self.longs.iter().flat_map(move |l| {
            let mut forms = vec![(l.clone(), false)];
            if self.toggle {
                forms.push((format!("no-{}", l), true));
            }
            forms
        })
    }

    fn display_name(&self) -> String {
        match self.longs.first() {
            Some(long) => format!("--{}", long),
            None => self.shorts.first().map(|c| format!("-{}", c)).unwrap_or_default(),
        }
    }
}

impl<D> Default for FlagSpec<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for FlagSpec<D> {
    fn clone(&self) -> Self {
        FlagSpec {
            longs: self.longs.clone(),
            shorts: self.shorts.clone(),
            toggle: self.toggle,
            arity: self.arity.clone(),
            summary: self.summary.clone(),
            action: self.action.clone(),
        }
    }
}

impl<D> fmt::Debug for FlagSpec<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSpec")
            .field("spelling", &self.help_spelling())
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// Catalog of registered flags
pub struct FlagScanner<D> {
    flags: Vec<FlagSpec<D>>,
}

impl<D> FlagScanner<D> {
    pub fn new() -> Self {
        FlagScanner { flags: Vec::new() }
    }

    pub fn add(&mut self, spec: FlagSpec<D>) {
        self.flags.push(spec);
    }

    pub fn flags(&self) -> &[FlagSpec<D>] {
        &self.flags
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Registered spellings one of whose literal forms starts with `prefix`
    ///
    /// A toggle is reported once, as `--[no-]name`.
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        let mut found = Vec::new();
        for flag in &self.flags {
            for c in &flag.shorts {
                let spelling = format!("-{}", c);
                if spelling.starts_with(prefix) {
                    found.push(spelling);
                }
            }
            for long in &flag.longs {
                let plain = format!("--{}", long);
                let matches = if flag.toggle {
                    let spelling = format!("--[no-]{}", long);
                    let hit = plain.starts_with(prefix)
                        || format!("--no-{}", long).starts_with(prefix)
                        || spelling.starts_with(prefix);
                    hit.then_some(spelling)
                } else {
                    plain.starts_with(prefix).then_some(plain)
                };
                if let Some(spelling) = matches {
                    found.push(spelling);
                }
            }
        }
        found.dedup();
        found
    }

    fn find_long(&self, name: &str) -> Result<(&FlagSpec<D>, bool), ScanError> {
        let unknown = || ScanError::InvalidOption(format!("--{}", name));
        if name.is_empty() {
            return Err(unknown());
        }

        let mut partial: Vec<(usize, bool)> = Vec::new();
        for (idx, flag) in self.flags.iter().enumerate() {
            for (form, negated) in flag.long_forms() {
                if form == name {
                    return Ok((flag, negated));
                }
                if form.starts_with(name) && !partial.contains(&(idx, negated)) {
                    partial.push((idx, negated));
                }
            }
        }

        match partial.as_slice() {
            [] => Err(unknown()),
            [(idx, negated)] => Ok((&self.flags[*idx], *negated)),
            _ => Err(ScanError::AmbiguousOption(format!("--{}", name))),
        }
    }

    fn find_short(&self, letter: char) -> Option<&FlagSpec<D>> {
        self.flags.iter().find(|f| f.shorts.contains(&letter))
    }
}

impl<D: ArgumentDestination> FlagScanner<D> {
    /// Scan `argv` left to right
    ///
    /// Flags fire their action (or are recorded into `dest`) as they are met;
    /// every other token is handed to `nonopt`, including all tokens after `--`.
    pub fn order<F>(&self, argv: &[String], dest: &mut D, mut nonopt: F) -> Result<(), ScanError>
    where
        F: FnMut(&mut D, &str),
    {
        let mut idx = 0;
        while idx < argv.len() {
            let arg = &argv[idx];
            idx += 1;

            if arg == "--" {
                for rest in &argv[idx..] {
                    nonopt(dest, rest);
                }
                break;
            }

            if let Some(body) = arg.strip_prefix("--") {
                let (name, inline) = match body.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (body, None),
                };
                let (flag, negated) = self.find_long(name)?;
                let value = match flag.arity() {
                    Arity::None => {
                        if inline.is_some() {
                            return Err(ScanError::NeedlessArgument(arg.clone()));
                        }
                        FlagValue::Switch(!negated)
                    }
                    Arity::Required(_) => match inline {
                        Some(v) => FlagValue::Text(v.to_string()),
                        None if idx < argv.len() => {
                            idx += 1;
                            FlagValue::Text(argv[idx - 1].clone())
                        }
                        None => return Err(ScanError::MissingArgument(format!("--{}", name))),
                    },
                    Arity::Optional(_) => match inline {
                        Some(v) => FlagValue::Text(v.to_string()),
                        None if idx < argv.len() && !argv[idx].starts_with('-') => {
                            idx += 1;
                            FlagValue::Text(argv[idx - 1].clone())
                        }
                        None => FlagValue::Switch(true),
                    },
                };
                fire(flag, dest, value)?;
            } else if arg.len() > 1 && arg.starts_with('-') {
                let letters: Vec<char> = arg.chars().skip(1).collect();
                let mut pos = 0;
                while pos < letters.len() {
                    let letter = letters[pos];
                    pos += 1;
                    let flag = self
                        .find_short(letter)
                        .ok_or_else(|| ScanError::InvalidOption(format!("-{}", letter)))?;
                    let attached: String = letters[pos..].iter().collect();

                    let value = match flag.arity() {
                        Arity::None => {
                            fire(flag, dest, FlagValue::Switch(true))?;
                            continue;
                        }
                        Arity::Required(_) if !attached.is_empty() => FlagValue::Text(attached),
                        Arity::Required(_) if idx < argv.len() => {
                            idx += 1;
                            FlagValue::Text(argv[idx - 1].clone())
                        }
                        Arity::Required(_) => {
                            return Err(ScanError::MissingArgument(format!("-{}", letter)))
                        }
                        Arity::Optional(_) if !attached.is_empty() => FlagValue::Text(attached),
                        Arity::Optional(_) if idx < argv.len() && !argv[idx].starts_with('-') => {
                            idx += 1;
                            FlagValue::Text(argv[idx - 1].clone())
                        }
                        Arity::Optional(_) => FlagValue::Switch(true),
                    };
                    fire(flag, dest, value)?;
                    break;
                }
            } else {
                nonopt(dest, arg);
            }
        }
        Ok(())
    }
}

impl<D> Default for FlagScanner<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for FlagScanner<D> {
    fn clone(&self) -> Self {
        FlagScanner {
            flags: self.flags.clone(),
        }
    }
}

fn fire<D: ArgumentDestination>(
    flag: &FlagSpec<D>,
    dest: &mut D,
    value: FlagValue,
) -> Result<(), ScanError> {
    match &flag.action {
        Some(action) => action(dest, value).map_err(|reason| ScanError::InvalidArgument {
            flag: flag.display_name(),
            reason,
        }),
        None => {
            dest.record_flag(&flag.key(), value);
            Ok(())
        }
    }
}
