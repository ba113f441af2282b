//! CLI subcommand implementations for the skimmer binary.

pub mod doctor;
pub mod newest_cmd;
pub mod output;
pub mod rank_cmd;
