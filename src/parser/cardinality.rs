//! Positional cardinality rules

use crate::error::Expectation;
use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::sync::Arc;

/// Test over the positional count; may consult the destination and may fail
pub type PredicateFn<D> = Arc<dyn Fn(usize, &D) -> Result<bool, String> + Send + Sync>;

const OBSCURE_EXPLANATION: &str = "A rule exists about the number of positional arguments.";

/// An arbitrary count test with an optional sentence for help
pub struct Predicate<D> {
    test: PredicateFn<D>,
    explanation: Option<String>,
}

impl<D> Clone for Predicate<D> {
    fn clone(&self) -> Self {
        Predicate {
            test: Arc::clone(&self.test),
            explanation: self.explanation.clone(),
        }
    }
}

/// How many positional arguments a command accepts
pub enum Cardinality<D> {
    Exact(usize),
    Range(RangeInclusive<usize>),
    Predicate(Predicate<D>),
}

impl<D> Cardinality<D> {
    /// A rule decided by `test`
    pub fn predicate<F>(test: F) -> Self
    where
        F: Fn(usize, &D) -> Result<bool, String> + Send + Sync + 'static,
    {
        Cardinality::Predicate(Predicate {
            test: Arc::new(test),
            explanation: None,
        })
    }

    /// A rule decided by `test`, described by `explanation` in help
    pub fn predicate_explained<F>(test: F, explanation: &str) -> Self
    where
        F: Fn(usize, &D) -> Result<bool, String> + Send + Sync + 'static,
    {
        Cardinality::Predicate(Predicate {
            test: Arc::new(test),
            explanation: Some(explanation.to_string()),
        })
    }

    /// Evaluate the rule
    pub fn check(&self, count: usize, dest: &D) -> Result<bool, String> {
        match self {
            Cardinality::Exact(n) => Ok(count == *n),
            Cardinality::Range(range) => Ok(range.contains(&count)),
            Cardinality::Predicate(p) => (p.test)(count, dest),
        }
    }

    /// Shape of the rule for error messages
    pub fn expectation(&self) -> Expectation {
        match self {
            Cardinality::Exact(n) => Expectation::Exact(*n),
            Cardinality::Range(range) => Expectation::Range {
                lo: *range.start(),
                hi: *range.end(),
            },
            Cardinality::Predicate(_) => Expectation::Rule,
        }
    }

    /// Sentence for help, or `None` when there is nothing worth saying
    pub fn explanation(&self) -> Option<String> {
        match self {
            Cardinality::Exact(0) => None,
            Cardinality::Exact(1) => Some("Requires 1 positional argument.".to_string()),
            Cardinality::Exact(n) => Some(format!("Requires {} positional arguments.", n)),
            Cardinality::Range(range) => Some(format!(
                "Requires {}..{} (inclusive) positional arguments.",
                range.start(),
                range.end()
            )),
            Cardinality::Predicate(p) => Some(
                p.explanation
                    .clone()
                    .unwrap_or_else(|| OBSCURE_EXPLANATION.to_string()),
            ),
        }
    }
}

impl<D: 'static> Cardinality<D> {
    /// Well-known count predicates by name: `even`, `odd`, `nonzero`
    pub fn named(name: &str) -> Option<Self> {
        let test: fn(usize) -> bool = match name {
            "even" => |n| n % 2 == 0,
            "odd" => |n| n % 2 == 1,
            "nonzero" => |n| n != 0,
            _ => return None,
        };
        Some(Self::predicate_explained(
            move |n, _| Ok(test(n)),
            &format!("Positional argument count must be {}.", name),
        ))
    }
}

impl<D> Clone for Cardinality<D> {
    fn clone(&self) -> Self {
        match self {
            Cardinality::Exact(n) => Cardinality::Exact(*n),
            Cardinality::Range(range) => Cardinality::Range(range.clone()),
            Cardinality::Predicate(p) => Cardinality::Predicate(p.clone()),
        }
    }
}

impl<D> fmt::Debug for Cardinality<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Exact(n) => f.debug_tuple("Exact").field(n).finish(),
            Cardinality::Range(range) => f.debug_tuple("Range").field(range).finish(),
            Cardinality::Predicate(p) => f
                .debug_struct("Predicate")
                .field("explanation", &p.explanation)
                .finish(),
        }
    }
}

impl<D> From<usize> for Cardinality<D> {
    fn from(n: usize) -> Self {
        Cardinality::Exact(n)
    }
}

impl<D> From<RangeInclusive<usize>> for Cardinality<D> {
    fn from(range: RangeInclusive<usize>) -> Self {
        Cardinality::Range(range)
    }
}

/// Exclusive ranges are converted to their inclusive equivalent
impl<D> From<Range<usize>> for Cardinality<D> {
    fn from(range: Range<usize>) -> Self {
        if range.end > range.start {
            Cardinality::Range(range.start..=range.end - 1)
        } else {
            // Matches nothing
            Cardinality::Range(1..=0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(rule: &Cardinality<()>, n: usize) -> bool {
        rule.check(n, &()).unwrap()
    }

    #[test]
    fn test_table_of_rules() {
        let cases: Vec<(Cardinality<()>, usize, bool)> = vec![
            (0usize.into(), 0, true),
            (0usize.into(), 1, false),
            ((0usize..=1).into(), 0, true),
            ((0usize..=1).into(), 1, true),
            ((0usize..=1).into(), 2, false),
            (Cardinality::named("even").unwrap(), 0, true),
            (Cardinality::named("even").unwrap(), 1, false),
            (Cardinality::named("even").unwrap(), 2, true),
        ];
        for (rule, count, expected) in cases {
            assert_eq!(ok(&rule, count), expected, "{:?} with {}", rule, count);
        }
    }

    #[test]
    fn test_exclusive_range_conversion() {
        let rule: Cardinality<()> = (2usize..4).into();
        assert_eq!(rule.expectation(), Expectation::Range { lo: 2, hi: 3 });
        assert!(!ok(&rule, 4));

        let empty: Cardinality<()> = (0usize..0).into();
        assert!(!ok(&empty, 0));
        assert!(!ok(&empty, 1));

        let at_the_end: Cardinality<()> = (usize::MAX..usize::MAX).into();
        assert!(!ok(&at_the_end, usize::MAX));
        assert!(!ok(&at_the_end, 0));
        assert!(!ok(&at_the_end, 1));
    }

    #[test]
    fn test_explanations() {
        assert_eq!(Cardinality::<()>::Exact(0).explanation(), None);
        let one = Cardinality::<()>::Exact(1).explanation().unwrap();
        assert!(one.contains("Requires 1 positional argument."));
        let two = Cardinality::<()>::Exact(2).explanation().unwrap();
        assert!(two.contains("2 positional arguments"));
        let range = Cardinality::<()>::Range(2..=3).explanation().unwrap();
        assert!(range.contains("2..3") && range.contains("inclusive"));
        let even = Cardinality::<()>::named("even").unwrap().explanation().unwrap();
        assert_eq!(even, "Positional argument count must be even.");
        let custom = Cardinality::<()>::predicate(|n, _| Ok(n % 3 == 1))
            .explanation()
            .unwrap();
        assert!(custom.contains("rule") && custom.contains("number of positional arguments"));
    }

    #[test]
    fn test_unknown_named_predicate() {
        assert!(Cardinality::<()>::named("prime").is_none());
    }

    #[test]
    fn test_predicate_sees_destination() {
        let rule = Cardinality::<Vec<String>>::predicate(|n, dest| match dest.first() {
            Some(first) => Ok(n == first.len()),
            None => Err("no reference argument yet".to_string()),
        });
        assert!(rule.check(1, &Vec::new()).is_err());
        assert_eq!(rule.check(3, &vec!["abc".to_string()]), Ok(true));
    }
}
