//! Pairwise intersection of interval sequences.
//!
//! A two-pointer sweep over both inputs, linear in their combined length.
//! Overlaps are appended to the output as they are found; an overlap that
//! touches or overlaps the last emitted span extends it instead, so the result
//! never contains zero-gap splits.

use crate::interval::{IntervalSequence, Span};

/// Returns the maximal ranges covered by both `a` and `b`.
///
/// Both inputs are expected to satisfy the sequence invariants (see
/// [`IntervalSequence::validate`]). Malformed input is not rejected: the sweep
/// still terminates and never indexes out of bounds, but the result is
/// unspecified.
pub fn intersect(a: &IntervalSequence, b: &IntervalSequence) -> IntervalSequence {
    let (a, b) = (a.spans(), b.spans());
    let mut overlap: Vec<Span> = Vec::new();
    let (mut i, mut j) = (0, 0);

    while let (Some(x), Some(y)) = (a.get(i), b.get(j)) {
        let start = x.start.max(y.start);
        let end = x.end.min(y.end);

        if start < end {
            match overlap.last_mut() {
                Some(last) if last.end >= start => last.end = last.end.max(end),
                _ => overlap.push(Span::new(start, end)),
            }
        }

        // On equal ends `b` advances.
        if x.end < y.end {
            i += 1;
        } else {
            j += 1;
        }
    }

    IntervalSequence::from_spans(overlap)
}
