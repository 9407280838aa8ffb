//! Selective text filtering with include/exclude regular expressions.
//!
//! A [`PatternFilter`] narrows free text before it is stored as a memory:
//!
//! 1. The include pattern, when present, keeps only its matches. Matches are
//!    joined with [`INCLUDE_SEPARATOR`]. Zero matches end filtering with
//!    [`FilterOutcome::NoIncludeMatches`] and the exclude pattern is skipped.
//! 2. The exclude pattern, when present, removes every match from the working
//!    text.
//!
//! Both patterns are compiled with dot-matches-newline, so a single match can
//! span lines. The accepted dialect is described in [`dialect`]. Invalid
//! patterns never fail the call: the step is skipped and a
//! [`FilterWarning`] is recorded. Applying the same filter twice is not
//! guaranteed to be a no-op, because the separator inserted between include
//! matches can change where later matches fall.

pub mod dialect;

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use strum::Display;

use dialect::Pattern;

/// Separator placed between include matches.
pub const INCLUDE_SEPARATOR: &str = "\n\n";

/// Which of the two patterns a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PatternKind {
    Include,
    Exclude,
}

/// Recoverable problem encountered while filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterWarning {
    /// The pattern did not compile; its step was skipped.
    InvalidPattern {
        kind: PatternKind,
        pattern: String,
        reason: String,
    },
    /// Matching failed unexpectedly; the original text was kept.
    MatchFailure { reason: String },
}

impl fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterWarning::InvalidPattern {
                kind,
                pattern,
                reason,
            } => write!(f, "Invalid {} pattern '{}': {}", kind, pattern, reason),
            FilterWarning::MatchFailure { reason } => {
                write!(f, "Pattern matching failed: {}", reason)
            }
        }
    }
}

/// How the returned text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// No pattern was applied. The text is the input, unchanged.
    Unfiltered,
    /// At least one pattern compiled and was applied.
    Filtered,
    /// The include pattern matched nothing. The text is empty.
    NoIncludeMatches,
    /// Matching failed unexpectedly. The text is the input, unchanged.
    Fallback,
}

/// Result of running a [`PatternFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReport {
    /// Text after filtering.
    pub text: String,
    /// How `text` was produced.
    pub outcome: FilterOutcome,
    /// Recoverable problems, in the order they occurred.
    pub warnings: Vec<FilterWarning>,
}

impl FilterReport {
    fn unfiltered(text: &str) -> Self {
        Self {
            text: text.to_string(),
            outcome: FilterOutcome::Unfiltered,
            warnings: Vec::new(),
        }
    }

    /// Whether filtering left nothing worth storing.
    ///
    /// True when the include pattern matched nothing, or when the remaining
    /// text is empty or whitespace only.
    pub fn is_empty(&self) -> bool {
        self.outcome == FilterOutcome::NoIncludeMatches || self.text.trim().is_empty()
    }

    /// Whether any recoverable problem was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Consume the report, keeping only the text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Include/exclude pattern pair applied to text before it is stored.
///
/// Empty pattern strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternFilter {
    include: Option<String>,
    exclude: Option<String>,
}

impl PatternFilter {
    /// Create a filter from optional include and exclude patterns.
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include: non_empty(include),
            exclude: non_empty(exclude),
        }
    }

    /// Whether neither pattern is set.
    pub fn is_noop(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }

    /// Apply the filter to `text`.
    ///
    /// Never panics and never fails: invalid patterns and matching failures
    /// are reported through [`FilterReport::warnings`].
    pub fn apply(&self, text: &str) -> FilterReport {
        if self.is_noop() {
            return FilterReport::unfiltered(text);
        }

        guarded(text, || self.run(text))
    }

    fn run(&self, text: &str) -> FilterReport {
        let mut warnings = Vec::new();
        let mut applied = false;
        let mut working = Cow::Borrowed(text);

        if let Some(pattern) = &self.include {
            match Pattern::compile(pattern) {
                Ok(re) => {
                    let parts: Vec<&str> = re.spans(text).into_iter().map(|r| &text[r]).collect();
                    if parts.is_empty() {
                        tracing::warn!(pattern = %pattern, "No matches found for include pattern");
                        return FilterReport {
                            text: String::new(),
                            outcome: FilterOutcome::NoIncludeMatches,
                            warnings,
                        };
                    }
                    tracing::info!(matches = parts.len(), "Applied include pattern");
                    working = Cow::Owned(parts.join(INCLUDE_SEPARATOR));
                    applied = true;
                }
                Err(err) => {
                    warnings.push(invalid_pattern(PatternKind::Include, pattern, &err));
                }
            }
        }

        if let Some(pattern) = &self.exclude {
            match Pattern::compile(pattern) {
                Ok(re) => {
                    let stripped = re.strip(&working);
                    tracing::info!("Applied exclude pattern");
                    working = Cow::Owned(stripped);
                    applied = true;
                }
                Err(err) => {
                    warnings.push(invalid_pattern(PatternKind::Exclude, pattern, &err));
                }
            }
        }

        FilterReport {
            text: working.into_owned(),
            outcome: if applied {
                FilterOutcome::Filtered
            } else {
                FilterOutcome::Unfiltered
            },
            warnings,
        }
    }
}

/// Apply optional include/exclude patterns to `text`.
///
/// Shorthand for `PatternFilter::new(include, exclude).apply(text)`.
pub fn apply_patterns(text: &str, include: Option<&str>, exclude: Option<&str>) -> FilterReport {
    PatternFilter::new(include, exclude).apply(text)
}

fn non_empty(pattern: Option<&str>) -> Option<String> {
    pattern.filter(|p| !p.is_empty()).map(str::to_string)
}

/// Run `filter`, keeping `text` unchanged if it panics.
fn guarded(text: &str, filter: impl FnOnce() -> FilterReport) -> FilterReport {
    match panic::catch_unwind(AssertUnwindSafe(filter)) {
        Ok(report) => report,
        Err(payload) => {
            let reason = panic_reason(payload.as_ref());
            tracing::error!(reason = %reason, "Error applying selective patterns, keeping original text");
            FilterReport {
                text: text.to_string(),
                outcome: FilterOutcome::Fallback,
                warnings: vec![FilterWarning::MatchFailure { reason }],
            }
        }
    }
}

fn invalid_pattern(kind: PatternKind, pattern: &str, err: &regex::Error) -> FilterWarning {
    tracing::error!(%kind, pattern = %pattern, error = %err, "Invalid regex pattern, skipping");
    FilterWarning::InvalidPattern {
        kind,
        pattern: pattern.to_string(),
        reason: err.to_string(),
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
