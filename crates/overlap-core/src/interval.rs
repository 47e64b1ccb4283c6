//! Interval sequences: one actor's presence as ordered half-open spans.
//!
//! A sequence is built from a flat list of timestamps read as consecutive
//! `(start, end)` pairs. Construction through [`IntervalSequence::from_flat`]
//! only checks that the list pairs up; [`IntervalSequence::validate`] checks
//! the ordering invariants:
//!
//! - every span has `start < end`
//! - spans are sorted by `start`
//! - neighbours do not overlap (`end_k <= start_{k+1}`, touching is fine)

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a flat timestamp list is not a valid interval sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// The flat list cannot be split into `(start, end)` pairs.
    #[error("expected an even number of timestamps, got {len}")]
    OddLength { len: usize },

    /// A span does not cover any time.
    #[error("span {index} is empty: start {start} is not before end {end}")]
    EmptySpan { index: usize, start: u64, end: u64 },

    /// A span starts before the previous one ends.
    #[error("span {index} starts at {start}, before the previous span ends at {previous_end}")]
    Overlap {
        index: usize,
        previous_end: u64,
        start: u64,
    },
}

/// A half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Length of the span. Reversed spans count as zero.
    pub const fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub const fn contains(&self, point: u64) -> bool {
        self.start <= point && point < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Ordered presence spans of a single actor.
///
/// Serializes as the flat `[start, end, start, end, ...]` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct IntervalSequence(Vec<Span>);

impl IntervalSequence {
    /// Creates an empty sequence.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Pairs up a flat timestamp list without checking ordering.
    pub fn from_flat(flat: Vec<u64>) -> Result<Self, IntervalError> {
        if flat.len() % 2 != 0 {
            return Err(IntervalError::OddLength { len: flat.len() });
        }
        let spans = flat
            .chunks_exact(2)
            .map(|pair| Span::new(pair[0], pair[1]))
            .collect();
        Ok(Self(spans))
    }

    /// Pairs up a flat timestamp list and checks every sequence invariant.
    pub fn try_new(flat: Vec<u64>) -> Result<Self, IntervalError> {
        let sequence = Self::from_flat(flat)?;
        sequence.validate()?;
        Ok(sequence)
    }

    /// Wraps spans that are already known to be sorted and disjoint.
    pub(crate) const fn from_spans(spans: Vec<Span>) -> Self {
        Self(spans)
    }

    /// Checks that spans are non-empty, sorted and mutually disjoint.
    ///
    /// Returns the first violation found, scanning from the front.
    pub fn validate(&self) -> Result<(), IntervalError> {
        let mut previous_end: Option<u64> = None;
        for (index, span) in self.0.iter().enumerate() {
            if span.start >= span.end {
                return Err(IntervalError::EmptySpan {
                    index,
                    start: span.start,
                    end: span.end,
                });
            }
            if let Some(previous_end) = previous_end {
                if span.start < previous_end {
                    return Err(IntervalError::Overlap {
                        index,
                        previous_end,
                        start: span.start,
                    });
                }
            }
            previous_end = Some(span.end);
        }
        Ok(())
    }

    pub fn spans(&self) -> &[Span] {
        &self.0
    }

    /// Number of spans (not timestamps).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of span durations.
    pub fn total_duration(&self) -> u64 {
        self.0.iter().map(Span::duration).sum()
    }

    /// Returns true if any span covers `point`.
    pub fn contains(&self, point: u64) -> bool {
        self.0.iter().any(|span| span.contains(point))
    }

    /// Merges neighbours that touch or overlap.
    ///
    /// Assumes the sequence is sorted by `start`.
    #[must_use]
    pub fn coalesced(&self) -> Self {
        let mut merged: Vec<Span> = Vec::with_capacity(self.0.len());
        for span in &self.0 {
            if let Some(last) = merged.last_mut() {
                if span.start <= last.end {
                    last.end = last.end.max(span.end);
                    continue;
                }
            }
            merged.push(*span);
        }
        Self(merged)
    }

    /// Flattens back into `[start, end, start, end, ...]`.
    pub fn to_flat(&self) -> Vec<u64> {
        self.0.iter().flat_map(|span| [span.start, span.end]).collect()
    }
}

impl TryFrom<Vec<u64>> for IntervalSequence {
    type Error = IntervalError;

    fn try_from(value: Vec<u64>) -> Result<Self, Self::Error> {
        Self::from_flat(value)
    }
}

impl From<IntervalSequence> for Vec<u64> {
    fn from(sequence: IntervalSequence) -> Self {
        sequence.to_flat()
    }
}

impl fmt::Display for IntervalSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(empty)");
        }
        for (i, span) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{span}")?;
        }
        Ok(())
    }
}
