//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lesson attendance overlap.
///
/// Computes how long a pupil and a tutor were present together during a
/// lesson, from their recorded presence intervals.
#[derive(Debug, Parser)]
#[command(name = "overlap", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Evaluate logs without checking span ordering (overrides `strict`).
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute the shared presence time for one attendance log.
    Appearance {
        /// JSON log with `lesson`, `pupil` and `tutor` lists ("-" or omitted for stdin).
        input: Option<PathBuf>,

        /// Print the full breakdown as JSON.
        #[arg(long, conflicts_with = "explain")]
        json: bool,

        /// Print the overlapping ranges and formatted durations.
        #[arg(long)]
        explain: bool,
    },

    /// Intersect two flat interval lists.
    Intersect {
        /// First list, comma-separated (e.g. "0,40,60,100").
        #[arg(long)]
        a: String,

        /// Second list, comma-separated.
        #[arg(long)]
        b: String,
    },

    /// Check logs against expected durations (one JSON case per line).
    Verify {
        /// JSONL file of `{"intervals": {...}, "answer": N}` cases ("-" or omitted for stdin).
        input: Option<PathBuf>,
    },
}
