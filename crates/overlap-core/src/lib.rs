//! Core domain logic for lesson attendance overlap.
//!
//! This crate contains:
//! - Interval sequences: validated, ordered half-open presence spans
//! - Pairwise intersection: two-pointer sweep with output coalescing
//! - Attendance: time the pupil and tutor spent together inside a lesson

mod attendance;
mod intersect;
pub mod interval;

pub use attendance::{
    Attendance, AttendanceError, AttendanceLog, Role, appearance, evaluate_batch,
};
pub use intersect::intersect;
pub use interval::{IntervalError, IntervalSequence, Span};
