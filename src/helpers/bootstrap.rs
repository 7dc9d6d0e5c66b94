use anyhow::{Context, Result};
use human_panic::setup_panic;
use log::{debug, warn};

use crate::helpers::logging;

pub fn run<CliType>(
    fn_cli_parse: fn() -> CliType,
    fn_extract_logging: fn(&CliType) -> &logging::Params,
    fn_run: fn(CliType) -> Result<()>,
) -> Result<()> {
    setup_panic!();
    let env_res = dotenvy::dotenv();

    let cli = fn_cli_parse();
    let logger_handle = logging::configure_from(fn_extract_logging(&cli))?;

    // Only reported now because the logger wasn't up before
    if let Err(env_err) = env_res {
        if env_err.not_found() {
            debug!("No `.env` file found (recursively), using environment and flags only.")
        } else {
            warn!("Failed to load `.env` file: {}", env_err);
        }
    }

    let command_result = fn_run(cli)
        .context("Command failed");

    // Important with non-direct write mode
    // Handle needs to be kept alive until end of program
    logger_handle.flush();

    command_result
}
