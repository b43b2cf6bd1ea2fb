//! Rule tables and the matcher that evaluates them.
//!
//! A [`RuleSet`] is an ordered list of labelled patterns. Exclusion rules
//! always run first: a single exclusion hit vetoes the whole set, no matter
//! how many inclusion rules would have matched.

use regex::{Regex, RegexBuilder};

/// Whether a rule votes for or against its rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// A match means the text belongs to the rule set's intent.
    Include,
    /// A match vetoes the rule set.
    Exclude,
}

/// A single labelled pattern.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Stable name used in logs and diagnostics
    pub label: &'static str,

    /// Include or exclude
    pub polarity: Polarity,

    pattern: Regex,
}

impl Rule {
    /// Create an inclusion rule.
    pub fn include(label: &'static str, pattern: &str) -> Self {
        Self::new(label, Polarity::Include, pattern)
    }

    /// Create an exclusion rule.
    pub fn exclude(label: &'static str, pattern: &str) -> Self {
        Self::new(label, Polarity::Exclude, pattern)
    }

    // Patterns are compile-time literals; a bad one is a programming error
    // and is caught by the table tests.
    fn new(label: &'static str, polarity: Polarity, pattern: &str) -> Self {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .unwrap_or_else(|e| panic!("rule '{label}' has an invalid pattern: {e}"));
        Self { label, polarity, pattern }
    }

    /// Turn this rule into an exclusion, keeping its label and pattern.
    pub fn as_exclusion(&self) -> Self {
        Self { label: self.label, polarity: Polarity::Exclude, pattern: self.pattern.clone() }
    }

    /// Check the pattern alone, ignoring polarity.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// The underlying pattern source.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Outcome of evaluating a rule set against some text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// An exclusion rule matched.
    Excluded(&'static str),
    /// No exclusion matched and this inclusion rule did.
    Included(&'static str),
    /// Nothing matched.
    NoMatch,
}

impl Verdict {
    /// Whether the rule set accepted the text.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Included(_))
    }

    /// Label of the deciding rule, if any.
    pub fn label(&self) -> Option<&'static str> {
        match *self {
            Self::Excluded(label) | Self::Included(label) => Some(label),
            Self::NoMatch => None,
        }
    }
}

/// An ordered, named collection of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: &'static str,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create a rule set. Rule order is preserved within each polarity.
    pub fn new(name: &'static str, rules: Vec<Rule>) -> Self {
        Self { name, rules }
    }

    /// Name of this rule set.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up a rule by label.
    pub fn rule(&self, label: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.label == label)
    }

    /// Evaluate exclusions first, then inclusions, short-circuiting on the
    /// first hit in each pass.
    pub fn evaluate(&self, text: &str) -> Verdict {
        if let Some(rule) = self.with_polarity(Polarity::Exclude).find(|r| r.is_match(text)) {
            return Verdict::Excluded(rule.label);
        }

        self.with_polarity(Polarity::Include)
            .find(|r| r.is_match(text))
            .map_or(Verdict::NoMatch, |r| Verdict::Included(r.label))
    }

    /// Whether the text belongs to this rule set's intent.
    pub fn matches(&self, text: &str) -> bool {
        self.evaluate(text).is_match()
    }

    fn with_polarity(&self, polarity: Polarity) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.polarity == polarity)
    }
}
