//! CLI subcommand implementations for the reelstat binary.

pub mod analyze_cmd;
pub mod serve_cmd;
