//! Positional-capture parser
//!
//! Wraps the flag scanner with a policy for the non-flag tokens: where they
//! accumulate, how many are acceptable, and how each one is transformed on
//! the way in.

use crate::error::{ParseError, ParseResult, ScanError};
use crate::parser::{ArgumentDestination, Cardinality, FlagScanner, FlagSpec, FlagValue};
use std::fmt;
use std::sync::Arc;

/// Transform applied to each raw positional before it is accumulated
pub type PositionalMapper<D> = Arc<dyn Fn(&D, String) -> String + Send + Sync>;

/// Callback yielding the sequence inside a destination that receives positionals
pub type SequenceBinder<D> = Arc<dyn Fn(&mut D) -> &mut Vec<String> + Send + Sync>;

/// Where captured positionals land
pub enum CaptureSink<D> {
    /// The destination's default sequence
    Default,
    /// A named slot in the destination
    Slot(String),
    /// A sequence chosen by a callback
    Bound(SequenceBinder<D>),
}

impl<D> CaptureSink<D> {
    pub fn slot(name: &str) -> Self {
        CaptureSink::Slot(name.to_string())
    }

    pub fn bound<F>(binder: F) -> Self
    where
        F: Fn(&mut D) -> &mut Vec<String> + Send + Sync + 'static,
    {
        CaptureSink::Bound(Arc::new(binder))
    }
}

impl<D: ArgumentDestination> CaptureSink<D> {
    fn sequence<'a>(&self, dest: &'a mut D) -> Option<&'a mut Vec<String>> {
        match self {
            CaptureSink::Default => dest.capture_slot(None),
            CaptureSink::Slot(name) => dest.capture_slot(Some(name)),
            CaptureSink::Bound(binder) => Some(binder(dest)),
        }
    }
}

impl<D> Clone for CaptureSink<D> {
    fn clone(&self) -> Self {
        match self {
            CaptureSink::Default => CaptureSink::Default,
            CaptureSink::Slot(name) => CaptureSink::Slot(name.clone()),
            CaptureSink::Bound(binder) => CaptureSink::Bound(Arc::clone(binder)),
        }
    }
}

impl<D> fmt::Debug for CaptureSink<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureSink::Default => f.write_str("Default"),
            CaptureSink::Slot(name) => f.debug_tuple("Slot").field(name).finish(),
            CaptureSink::Bound(_) => f.write_str("Bound(..)"),
        }
    }
}

/// Flag scanner plus positional policy for one command
///
/// Configure once, then parse as often as needed: parsing never mutates the
/// parser, only the destination it is given.
pub struct CommandOptionParser<D> {
    scanner: FlagScanner<D>,
    cardinality: Option<Cardinality<D>>,
    explanation: Option<String>,
    sink: CaptureSink<D>,
    precapture: bool,
    mapper: Option<PositionalMapper<D>>,
}

impl<D: ArgumentDestination> CommandOptionParser<D> {
    pub fn new() -> Self {
        CommandOptionParser {
            scanner: FlagScanner::new(),
            cardinality: None,
            explanation: None,
            sink: CaptureSink::Default,
            precapture: false,
            mapper: None,
        }
    }

    /// Register a flag
    pub fn on(&mut self, spec: FlagSpec<D>) -> &mut Self {
        self.scanner.add(spec);
        self
    }

    /// Register a flag from its spelling, e.g. `-m, --message MESSAGE`
    pub fn on_spelling(&mut self, spelling: &str) -> Result<&mut Self, ScanError> {
        self.scanner.add(FlagSpec::from_spelling(spelling)?);
        Ok(self)
    }

    /// Register a flag from its spelling with an action
    pub fn on_spelling_with<F>(&mut self, spelling: &str, action: F) -> Result<&mut Self, ScanError>
    where
        F: Fn(&mut D, FlagValue) -> Result<(), String> + Send + Sync + 'static,
    {
        self.scanner
            .add(FlagSpec::from_spelling(spelling)?.action(action));
        Ok(self)
    }

    pub fn flags(&self) -> &FlagScanner<D> {
        &self.scanner
    }

    /// Constrain the number of positionals; replaces any earlier rule and
    /// its explanation
    pub fn expect_positional_cardinality(&mut self, rule: impl Into<Cardinality<D>>) -> &mut Self {
        self.cardinality = Some(rule.into());
        self.explanation = None;
        self
    }

    /// Like [`expect_positional_cardinality`](Self::expect_positional_cardinality)
    /// with an explicit sentence for help
    pub fn expect_positional_cardinality_explained(
        &mut self,
        rule: impl Into<Cardinality<D>>,
        explanation: &str,
    ) -> &mut Self {
        self.cardinality = Some(rule.into());
        self.explanation = Some(explanation.to_string());
        self
    }

    /// Reject any positional argument
    pub fn no_positional_args(&mut self) -> &mut Self {
        self.expect_positional_cardinality(Cardinality::Exact(0))
    }

    /// Choose where positionals go
    ///
    /// With `precapture`, the sequence is bound before scanning and each
    /// mapped positional is pushed as it arrives, so the mapper can see its
    /// predecessors. Without it, the sequence is filled once scanning ends.
    pub fn capture_positionals(&mut self, sink: CaptureSink<D>, precapture: bool) -> &mut Self {
        self.sink = sink;
        self.precapture = precapture;
        self
    }

    /// Transform each positional before accumulation
    ///
    /// The mapper sees the destination as it stands when the positional is
    /// met: flags to its left have already fired.
    pub fn map_positional_args<F>(&mut self, mapper: F) -> &mut Self
    where
        F: Fn(&D, String) -> String + Send + Sync + 'static,
    {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    pub fn positional_cardinality(&self) -> Option<&Cardinality<D>> {
        self.cardinality.as_ref()
    }

    /// False only when positionals are prohibited outright
    ///
    /// A predicate or range that happens to admit only zero is not detected.
    pub fn positional_arguments_allowed(&self) -> bool {
        !matches!(self.cardinality, Some(Cardinality::Exact(0)))
    }

    /// Whether `count` positionals would be acceptable, judged against a
    /// fresh destination
    pub fn cardinality_satisfied(&self, count: usize) -> bool {
        self.cardinality_satisfied_with(count, &D::default())
    }

    /// Whether `count` positionals would be acceptable given `dest`
    ///
    /// A predicate that fails to evaluate counts as satisfied.
    pub fn cardinality_satisfied_with(&self, count: usize, dest: &D) -> bool {
        match &self.cardinality {
            None => true,
            Some(rule) => rule.check(count, dest).unwrap_or(true),
        }
    }

    /// Sentence describing the cardinality for help
    pub fn describe_cardinality(&self) -> Option<String> {
        if let Some(explicit) = &self.explanation {
            return Some(explicit.clone());
        }
        self.cardinality.as_ref().and_then(Cardinality::explanation)
    }

    /// Flag spellings starting with `prefix`
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        self.scanner.candidates(prefix)
    }

    /// Parse `argv` into `dest`
    ///
    /// Returns the positionals in encounter order, mapped. Flag actions fire
    /// left to right, once per occurrence.
    pub fn parse<S: AsRef<str>>(&self, argv: &[S], dest: &mut D) -> ParseResult<Vec<String>> {
        let argv: Vec<String> = argv.iter().map(|a| a.as_ref().to_string()).collect();
        let mut positionals = Vec::new();

        if self.precapture {
            if let Some(seq) = self.sink.sequence(dest) {
                seq.clear();
            }
        }

        self.scanner.order(&argv, dest, |dest, token| {
            let mapped = match &self.mapper {
                Some(mapper) => mapper(dest, token.to_string()),
                None => token.to_string(),
            };
            if self.precapture {
                if let Some(seq) = self.sink.sequence(dest) {
                    seq.push(mapped.clone());
                }
            }
            positionals.push(mapped);
        })?;

        if !self.precapture {
            if let Some(seq) = self.sink.sequence(dest) {
                *seq = positionals.clone();
            }
        }

        self.check_cardinality(positionals.len(), dest)?;
        Ok(positionals)
    }

    fn check_cardinality(&self, count: usize, dest: &D) -> ParseResult<()> {
        let Some(rule) = &self.cardinality else {
            return Ok(());
        };
        match rule.check(count, dest) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ParseError::WrongArgumentCount {
                expected: rule.expectation(),
                actual: count,
            }),
            Err(reason) => Err(ParseError::Rule(reason)),
        }
    }
}

impl<D: ArgumentDestination> Default for CommandOptionParser<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for CommandOptionParser<D> {
    fn clone(&self) -> Self {
        CommandOptionParser {
            scanner: self.scanner.clone(),
            cardinality: self.cardinality.clone(),
            explanation: self.explanation.clone(),
            sink: self.sink.clone(),
            precapture: self.precapture,
            mapper: self.mapper.clone(),
        }
    }
}
