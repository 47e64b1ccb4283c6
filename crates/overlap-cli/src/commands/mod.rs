//! CLI subcommand implementations.

pub mod appearance;
pub mod intersect;
pub mod util;
pub mod verify;
