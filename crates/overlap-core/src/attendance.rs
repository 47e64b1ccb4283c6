//! Lesson attendance evaluation.
//!
//! # Algorithm Summary
//!
//! 1. Intersect the pupil's and tutor's presence (`both_present`)
//! 2. Intersect that with the lesson window (`in_lesson`)
//! 3. Sum the span durations of `in_lesson`

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interval::{IntervalError, IntervalSequence};
use crate::intersect::intersect;

/// Which sequence of an [`AttendanceLog`] a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Lesson,
    Pupil,
    Tutor,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Lesson, Self::Pupil, Self::Tutor];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Pupil => "pupil",
            Self::Tutor => "tutor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attendance log errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttendanceError {
    /// One of the three sequences breaks the sequence invariants.
    #[error("invalid {role} intervals")]
    InvalidInterval {
        role: Role,
        #[source]
        source: IntervalError,
    },
}

/// The three presence records of a single lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceLog {
    /// Scheduled lesson window, usually a single span.
    pub lesson: IntervalSequence,
    pub pupil: IntervalSequence,
    pub tutor: IntervalSequence,
}

/// Breakdown of an evaluated [`AttendanceLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendance {
    /// Ranges where pupil and tutor were both present.
    pub both_present: IntervalSequence,

    /// `both_present` clipped to the lesson window.
    pub in_lesson: IntervalSequence,

    /// Total length of `in_lesson`, in the unit of the input timestamps.
    pub duration: u64,
}

impl AttendanceLog {
    pub const fn new(
        lesson: IntervalSequence,
        pupil: IntervalSequence,
        tutor: IntervalSequence,
    ) -> Self {
        Self {
            lesson,
            pupil,
            tutor,
        }
    }

    pub const fn sequence(&self, role: Role) -> &IntervalSequence {
        match role {
            Role::Lesson => &self.lesson,
            Role::Pupil => &self.pupil,
            Role::Tutor => &self.tutor,
        }
    }

    /// Checks every sequence, reporting the first offending role.
    ///
    /// Evaluation does not require this; it only rules out the inputs for
    /// which the result is unspecified.
    pub fn validate(&self) -> Result<(), AttendanceError> {
        for role in Role::ALL {
            self.sequence(role)
                .validate()
                .map_err(|source| AttendanceError::InvalidInterval { role, source })?;
        }
        Ok(())
    }

    /// Computes when pupil and tutor were present together during the lesson.
    pub fn evaluate(&self) -> Attendance {
        let both_present = intersect(&self.pupil, &self.tutor);
        let in_lesson = intersect(&both_present, &self.lesson);
        let duration = in_lesson.total_duration();

        tracing::debug!(
            lesson = self.lesson.len(),
            pupil = self.pupil.len(),
            tutor = self.tutor.len(),
            both_present = both_present.len(),
            in_lesson = in_lesson.len(),
            duration,
            "evaluated attendance"
        );

        Attendance {
            both_present,
            in_lesson,
            duration,
        }
    }
}

/// Total time during which the lesson, the pupil and the tutor were all active.
pub fn appearance(
    lesson: &IntervalSequence,
    pupil: &IntervalSequence,
    tutor: &IntervalSequence,
) -> u64 {
    let both_present = intersect(pupil, tutor);
    intersect(&both_present, lesson).total_duration()
}

/// Evaluates independent logs in parallel, preserving input order.
pub fn evaluate_batch(logs: &[AttendanceLog]) -> Vec<Attendance> {
    tracing::debug!(logs = logs.len(), "evaluating attendance batch");
    logs.par_iter().map(AttendanceLog::evaluate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn seq(flat: &[u64]) -> IntervalSequence {
        IntervalSequence::from_flat(flat.to_vec()).unwrap()
    }

    fn log(lesson: &[u64], pupil: &[u64], tutor: &[u64]) -> AttendanceLog {
        AttendanceLog::new(seq(lesson), seq(pupil), seq(tutor))
    }

    #[test]
    fn single_overlap_inside_lesson() {
        let result = log(&[0, 100], &[10, 50], &[20, 80]).evaluate();
        assert_eq!(result.both_present, seq(&[20, 50]));
        assert_eq!(result.in_lesson, seq(&[20, 50]));
        assert_eq!(result.duration, 30);
    }

    #[test]
    fn pupil_leaves_and_returns() {
        let result = log(&[0, 100], &[0, 40, 60, 100], &[30, 70]).evaluate();
        assert_eq!(result.both_present, seq(&[30, 40, 60, 70]));
        assert_eq!(result.in_lesson, seq(&[30, 40, 60, 70]));
        assert_eq!(result.duration, 20);
    }

    #[test]
    fn recorded_lesson_with_reconnects() {
        let lesson = seq(&[1_594_663_200, 1_594_666_800]);
        let pupil = seq(&[
            1_594_663_340,
            1_594_663_389,
            1_594_663_390,
            1_594_663_395,
            1_594_663_396,
            1_594_666_472,
        ]);
        let tutor = seq(&[
            1_594_663_290,
            1_594_663_430,
            1_594_663_443,
            1_594_666_473,
        ]);
        assert_eq!(appearance(&lesson, &pupil, &tutor), 3117);
    }

    #[test]
    fn presence_outside_lesson_is_clipped() {
        let lesson = seq(&[1_594_692_000, 1_594_695_600]);
        let pupil = seq(&[1_594_692_033, 1_594_696_347]);
        let tutor = seq(&[
            1_594_692_017,
            1_594_692_066,
            1_594_692_068,
            1_594_696_341,
        ]);
        assert_eq!(appearance(&lesson, &pupil, &tutor), 3565);
    }

    // Pupil log with overlapping and empty spans, as produced by clients that
    // report reconnects before the previous session closed.
    #[test]
    fn overlapping_pupil_log_without_validation() {
        let lesson = seq(&[1_594_702_800, 1_594_706_400]);
        let pupil = seq(&[
            1_594_702_789,
            1_594_704_500,
            1_594_702_807,
            1_594_704_542,
            1_594_704_512,
            1_594_704_513,
            1_594_704_564,
            1_594_705_150,
            1_594_704_581,
            1_594_704_582,
            1_594_704_734,
            1_594_705_009,
            1_594_705_095,
            1_594_705_096,
            1_594_705_106,
            1_594_706_480,
            1_594_705_158,
            1_594_705_773,
            1_594_705_849,
            1_594_706_480,
            1_594_706_500,
            1_594_706_875,
            1_594_706_502,
            1_594_706_503,
            1_594_706_524,
            1_594_706_524,
            1_594_706_579,
            1_594_706_641,
        ]);
        let tutor = seq(&[
            1_594_700_035,
            1_594_700_364,
            1_594_702_749,
            1_594_705_148,
            1_594_705_149,
            1_594_706_463,
        ]);
        let attendance = AttendanceLog::new(lesson, pupil, tutor);

        assert!(matches!(
            attendance.validate(),
            Err(AttendanceError::InvalidInterval {
                role: Role::Pupil,
                ..
            })
        ));
        assert_eq!(attendance.evaluate().duration, 3577);
    }

    #[test]
    fn empty_pupil_yields_zero() {
        let result = log(&[0, 100], &[], &[20, 80]).evaluate();
        assert!(result.both_present.is_empty());
        assert_eq!(result.duration, 0);
    }

    #[test]
    fn all_empty_yields_zero() {
        assert_eq!(AttendanceLog::default().evaluate().duration, 0);
    }

    #[test]
    fn lesson_may_have_several_spans() {
        let result = log(&[0, 10, 20, 30], &[0, 30], &[5, 25]).evaluate();
        assert_eq!(result.in_lesson, seq(&[5, 10, 20, 25]));
        assert_eq!(result.duration, 10);
    }

    #[test]
    fn validate_names_offending_role() {
        let err = log(&[0, 100], &[10, 50], &[80, 20]).validate().unwrap_err();
        assert_eq!(
            err,
            AttendanceError::InvalidInterval {
                role: Role::Tutor,
                source: IntervalError::EmptySpan {
                    index: 0,
                    start: 80,
                    end: 20
                },
            }
        );
        assert_eq!(err.to_string(), "invalid tutor intervals");
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            "span 0 is empty: start 80 is not before end 20"
        );
    }

    #[test]
    fn evaluate_batch_preserves_order() {
        let logs = vec![
            log(&[0, 100], &[10, 50], &[20, 80]),
            log(&[0, 100], &[], &[20, 80]),
            log(&[0, 100], &[0, 40, 60, 100], &[30, 70]),
        ];
        let durations: Vec<u64> = evaluate_batch(&logs)
            .into_iter()
            .map(|result| result.duration)
            .collect();
        assert_eq!(durations, vec![30, 0, 20]);
    }

    #[test]
    fn log_deserializes_from_named_lists() {
        let json = r#"{"lesson": [0, 100], "pupil": [10, 50], "tutor": [20, 80]}"#;
        let parsed: AttendanceLog = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, log(&[0, 100], &[10, 50], &[20, 80]));
    }

    #[test]
    fn attendance_serializes_flat_lists() {
        let result = log(&[0, 100], &[10, 50], &[20, 80]).evaluate();
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"both_present":[20,50],"in_lesson":[20,50],"duration":30}"#
        );
    }

    fn valid_sequence() -> impl Strategy<Value = IntervalSequence> {
        prop::collection::vec((0u64..40, 1u64..40), 0..6).prop_map(|steps| {
            let mut cursor = 0;
            let mut flat = Vec::new();
            for (gap, len) in steps {
                flat.extend([cursor + gap, cursor + gap + len]);
                cursor += gap + len;
            }
            IntervalSequence::try_new(flat).unwrap()
        })
    }

    proptest! {
        #[test]
        fn appearance_matches_evaluate(
            lesson in valid_sequence(),
            pupil in valid_sequence(),
            tutor in valid_sequence(),
        ) {
            let attendance = AttendanceLog::new(lesson.clone(), pupil.clone(), tutor.clone());
            prop_assert_eq!(appearance(&lesson, &pupil, &tutor), attendance.evaluate().duration);
        }

        #[test]
        fn widening_pupil_never_decreases(
            lesson in valid_sequence(),
            pupil in valid_sequence(),
            tutor in valid_sequence(),
        ) {
            let everywhere = IntervalSequence::try_new(vec![0, u64::MAX]).unwrap();
            prop_assert!(
                appearance(&lesson, &pupil, &tutor) <= appearance(&lesson, &everywhere, &tutor)
            );
        }

        #[test]
        fn removing_a_tutor_span_never_increases(
            lesson in valid_sequence(),
            pupil in valid_sequence(),
            tutor in valid_sequence(),
        ) {
            let fewer: Vec<u64> = tutor.to_flat().into_iter().skip(2).collect();
            let fewer = IntervalSequence::try_new(fewer).unwrap();
            prop_assert!(
                appearance(&lesson, &pupil, &fewer) <= appearance(&lesson, &pupil, &tutor)
            );
        }
    }
}
