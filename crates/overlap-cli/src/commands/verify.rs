//! Verify command: evaluates a table of logs against expected durations.
//!
//! Input is JSONL, one case per line:
//!
//! ```text
//! {"intervals": {"lesson": [...], "pupil": [...], "tutor": [...]}, "answer": 3117}
//! ```

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use overlap_core::{AttendanceError, AttendanceLog, evaluate_batch};
use serde::Deserialize;

use super::util::format_duration;
use crate::Config;

/// A single verification case.
#[derive(Debug, Deserialize)]
struct Case {
    intervals: AttendanceLog,
    answer: u64,
}

/// Outcome counts for a verification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub invalid: usize,
}

impl Summary {
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.invalid
    }

    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.invalid == 0
    }
}

/// Runs every case, writing one line per case and a summary line.
pub fn run<W: Write>(writer: &mut W, input: &str, config: &Config) -> Result<Summary> {
    let cases = parse_cases(input.as_bytes())?;

    // Validation failures are reported per case instead of aborting the run.
    let mut rejected: Vec<(usize, AttendanceError)> = Vec::new();
    let mut accepted: Vec<(usize, u64)> = Vec::new();
    let mut logs: Vec<AttendanceLog> = Vec::new();
    for (line, case) in cases {
        if config.strict {
            if let Err(err) = case.intervals.validate() {
                rejected.push((line, err));
                continue;
            }
        }
        accepted.push((line, case.answer));
        logs.push(case.intervals);
    }

    let results = evaluate_batch(&logs);

    let mut summary = Summary::default();
    let mut outcomes: Vec<(usize, String)> = Vec::with_capacity(accepted.len() + rejected.len());
    for ((line, answer), attendance) in accepted.into_iter().zip(results) {
        if attendance.duration == answer {
            summary.passed += 1;
            outcomes.push((
                line,
                format!(
                    "ok {} ({})",
                    attendance.duration,
                    format_duration(attendance.duration, config.time_unit)
                ),
            ));
        } else {
            summary.failed += 1;
            outcomes.push((
                line,
                format!("FAIL expected {answer}, got {}", attendance.duration),
            ));
        }
    }
    for (line, err) in rejected {
        summary.invalid += 1;
        let err = anyhow::Error::new(err);
        outcomes.push((line, format!("invalid ({err:#})")));
    }
    outcomes.sort_by_key(|(line, _)| *line);

    for (line, outcome) in outcomes {
        writeln!(writer, "line {line}: {outcome}")?;
    }
    writeln!(
        writer,
        "{} case(s): {} passed, {} failed, {} invalid",
        summary.total(),
        summary.passed,
        summary.failed,
        summary.invalid
    )?;

    tracing::debug!(?summary, "verification finished");
    Ok(summary)
}

/// Parses JSONL cases, skipping blank lines. Returns 1-based line numbers.
fn parse_cases<R: BufRead>(reader: R) -> Result<Vec<(usize, Case)>> {
    let mut cases = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let case: Case = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid case on line {}", idx + 1))?;
        cases.push((idx + 1, case));
    }
    Ok(cases)
}
