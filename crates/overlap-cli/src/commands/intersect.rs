//! Intersect command for two ad-hoc interval lists.

use std::io::Write;

use anyhow::{Context, Result};
use overlap_core::IntervalSequence;

use super::util::parse_flat;
use crate::Config;

/// Runs the intersect command, printing the result as a comma-separated list.
pub fn run<W: Write>(writer: &mut W, a: &str, b: &str, config: &Config) -> Result<()> {
    let a = parse_sequence(a, "--a", config)?;
    let b = parse_sequence(b, "--b", config)?;

    let result = overlap_core::intersect(&a, &b);
    tracing::debug!(%result, "intersected sequences");

    let flat: Vec<String> = result.to_flat().iter().map(u64::to_string).collect();
    writeln!(writer, "{}", flat.join(","))?;
    Ok(())
}

fn parse_sequence(s: &str, name: &str, config: &Config) -> Result<IntervalSequence> {
    let flat = parse_flat(s).with_context(|| format!("invalid {name} list"))?;
    let sequence =
        IntervalSequence::from_flat(flat).with_context(|| format!("invalid {name} list"))?;
    if config.strict {
        sequence
            .validate()
            .with_context(|| format!("invalid {name} list"))?;
    }
    Ok(sequence)
}
