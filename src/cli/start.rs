use anyhow::Result;

use crate::cli::{actions::Action, commands, dispatch::handler, globals::GlobalArgs, telemetry};

/// Start the CLI: parse arguments, initialize logging, and hand back the
/// action to execute together with the global arguments.
///
/// # Errors
/// Returns an error if argument handling or telemetry setup fails.
pub fn start() -> Result<(Action, GlobalArgs)> {
    let matches = commands::new().get_matches();

    let verbosity_level = match matches.get_one::<u8>("verbosity").map_or(0, |&v| v) {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    telemetry::init(Some(verbosity_level))?;

    handler(&matches)
}
