//! Shared utilities for CLI commands.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat};

use crate::TimeUnit;

/// Reads the whole input from `path`, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Parses a comma-separated timestamp list. Blank input is an empty list.
pub fn parse_flat(s: &str) -> anyhow::Result<Vec<u64>> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u64>()
                .with_context(|| format!("invalid timestamp: {part:?}"))
        })
        .collect()
}

/// Formats a duration as "Xh Ym Zs", dropping leading zero components.
///
/// Sub-second millisecond durations are shown as "Nms".
pub fn format_duration(value: u64, unit: TimeUnit) -> String {
    let total_seconds = match unit {
        TimeUnit::Seconds => value,
        TimeUnit::Milliseconds if value < 1000 => return format!("{value}ms"),
        TimeUnit::Milliseconds => value / 1000,
    };
    let hours = total_seconds / 3600;
    let minutes = total_seconds % 3600 / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Renders a Unix timestamp as RFC 3339 UTC, or the raw number if out of range.
pub fn format_instant(value: u64, unit: TimeUnit) -> String {
    let Ok(raw) = i64::try_from(value) else {
        return value.to_string();
    };
    let rendered = match unit {
        TimeUnit::Seconds => {
            DateTime::from_timestamp(raw, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        }
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(raw)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
    };
    rendered.unwrap_or_else(|| value.to_string())
}
