//! Subcommands of the `tabular-rl` binary

pub mod inspect;
pub mod run;
