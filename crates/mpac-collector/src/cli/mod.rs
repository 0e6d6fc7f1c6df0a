//! CLI subcommand implementations for the `mpac-collector` binary.

pub mod collect_cmd;
pub mod doctor;
pub mod output;
