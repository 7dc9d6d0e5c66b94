use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use flexi_logger::{
    colored_default_format, detailed_format, Duplicate, FileSpec, Logger, LoggerHandle, WriteMode,
};
use log::Level;

/// Logging flags shared by all binaries. Log output goes to stderr, so that stdout
/// stays reserved for results.
#[derive(Args)]
#[derive(Debug)]
#[group(id = "logging")]
pub struct Params {
    #[clap(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Use a flexi_logger configuration file
    #[arg(long = "log-spec")]
    use_log_spec: bool,

    /// Path to log spec
    #[arg(long, value_name = "TOML FILE", default_value = "logspec.toml")]
    log_spec_file: PathBuf,

    /// Additionally write a detailed log to this directory
    #[arg(long, value_name = "DIR", env = "DIAG_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Params {
    /// Level requested on the command line, used if `RUST_LOG` is not set.
    pub fn level_spec(&self) -> String {
        // log_level() returns None iff verbosity < 0, i.e. being most quiet seems reasonable
        self.verbose.log_level()
            .unwrap_or(Level::Error)
            .to_string()
            .to_lowercase()
    }
}

pub fn configure_from(params: &Params) -> Result<LoggerHandle> {
    let mut log_builder = Logger::try_with_env_or_str(params.level_spec())
        .context("Failed to parse logger spec from env RUST_LOG or cli level")?
        .write_mode(WriteMode::Async)
        .format_for_stderr(colored_default_format)
        .format_for_files(detailed_format);

    if let Some(log_dir) = &params.log_dir {
        log_builder = log_builder
            .log_to_file(FileSpec::default().directory(log_dir))
            .duplicate_to_stderr(Duplicate::Warn);
    }

    match (&params.use_log_spec, &params.log_spec_file) {
        (true, specfile_path) => log_builder
            .start_with_specfile(specfile_path)
            .with_context(|| format!("Failed to start logger with specfile {:?}", *specfile_path)),
        (false, _) => log_builder
            .start().context("Failed to start logger handle w/o specfile")
    }
}
