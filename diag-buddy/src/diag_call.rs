use clap::Args;
use log::debug;
use thiserror::Error;

pub use self::callback::{ChannelCallback, NetDiagCallback};
pub use self::command::{CommandBuilder, CommandLine};
pub use self::runner::{CommandRunner, ExitCheck, ForkExecRunner};
pub use self::wrapper::NetDiagWrapper;

mod callback;
mod command;
mod runner;
mod wrapper;

#[derive(Args, Clone, Debug)]
#[group(id = "diag")]
pub struct Params {
    /// FQ path to ping binary
    #[arg(long, default_value = "/system/bin/ping", env = "PING_BIN_PATH")]
    pub ping_path: String,

    /// FQ path to netstat binary
    #[arg(long, default_value = "/system/bin/netstat", env = "NETSTAT_BIN_PATH")]
    pub netstat_path: String,

    /// FQ path to ifconfig binary
    #[arg(long, default_value = "/system/bin/ifconfig", env = "IFCONFIG_BIN_PATH")]
    pub ifconfig_path: String,
}

impl Params {
    pub fn to_wrapper(&self) -> NetDiagWrapper {
        let commands = CommandBuilder::new(self);
        debug!("Using diagnostic commands: {:?}", commands);
        NetDiagWrapper::new(commands, ForkExecRunner)
    }
}

#[derive(Error, Debug)]
pub enum DiagError {
    /// The request itself is unusable, nothing was executed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("failed to spawn `{command}`")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
}

impl DiagError {
    /// Whether this is a failure of the machinery rather than of the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, DiagError::Internal(_) | DiagError::Spawn { .. })
    }
}

pub type DiagResult<T> = Result<T, DiagError>;
