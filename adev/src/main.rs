// External crates
use clap::Parser;
use tracing::debug;

// Internal imports
use adev_core::adev_error;
use adev_messages::{msg, MESSAGES};

// Local modules
mod cli;
mod commands;

use cli::Args;
use commands::execute_command;

fn main() {
    let args = Args::parse();

    // Tests expect clean output, so logging stays off in test mode
    let _log_guard = if std::env::var("ADEV_TEST_MODE").is_err() {
        adev_logging::init_subscriber(if args.debug { "debug" } else { "warn" })
    } else {
        None
    };

    debug!(command = ?args.command, path = %args.path.display(), "starting ansible-dev");

    if let Err(e) = execute_command(args) {
        adev_error!("{}", msg!(MESSAGES.common.error_generic, error = format!("{e:#}")));
        std::process::exit(1);
    }
}
