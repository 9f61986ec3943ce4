//! Command-line interface.

pub mod commands;
pub mod types;

pub use types::{Cli, Commands, ConfigCommands};

use console::style;

/// Print an error and exit non-zero.
pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {err:#}", style("✗").red());
    std::process::exit(1);
}
