//! Appearance command: shared presence time for a single attendance log.

use std::io::Write;

use anyhow::{Context, Result};
use overlap_core::{AttendanceLog, IntervalSequence};

use super::util::{format_duration, format_instant};
use crate::{Config, TimeUnit};

/// How the result is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The bare duration.
    Plain,
    /// The full breakdown as pretty-printed JSON.
    Json,
    /// Human-readable ranges and durations.
    Explain,
}

/// Parses a JSON attendance log, applying strict validation if configured.
pub fn parse_log(input: &str, config: &Config) -> Result<AttendanceLog> {
    let log: AttendanceLog =
        serde_json::from_str(input).context("invalid attendance log JSON")?;
    if config.strict {
        log.validate()
            .context("attendance log rejected (use --lenient to evaluate anyway)")?;
    }
    Ok(log)
}

/// Runs the appearance command, returning the computed duration.
pub fn run<W: Write>(
    writer: &mut W,
    input: &str,
    format: OutputFormat,
    config: &Config,
) -> Result<u64> {
    let log = parse_log(input, config)?;
    let attendance = log.evaluate();

    match format {
        OutputFormat::Plain => writeln!(writer, "{}", attendance.duration)?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&attendance)?;
            writeln!(writer, "{json}")?;
        }
        OutputFormat::Explain => {
            write_ranges(writer, "both present", &attendance.both_present, config.time_unit)?;
            write_ranges(writer, "in lesson", &attendance.in_lesson, config.time_unit)?;
            writeln!(
                writer,
                "duration: {} ({})",
                attendance.duration,
                format_duration(attendance.duration, config.time_unit)
            )?;
        }
    }

    Ok(attendance.duration)
}

fn write_ranges<W: Write>(
    writer: &mut W,
    label: &str,
    sequence: &IntervalSequence,
    unit: TimeUnit,
) -> Result<()> {
    writeln!(writer, "{label}: {} range(s)", sequence.len())?;
    for span in sequence.spans() {
        writeln!(
            writer,
            "  {} .. {}  {}",
            format_instant(span.start, unit),
            format_instant(span.end, unit),
            format_duration(span.duration(), unit)
        )?;
    }
    Ok(())
}
