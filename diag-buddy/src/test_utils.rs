use std::io;
use std::sync::{Arc, Mutex};

use crate::diag_call::{
    CommandBuilder, CommandLine, CommandRunner, DiagError, DiagResult, ExitCheck, Params,
};

/// Captured output of the real tools, pinned so that parser changes are checked against them.
pub mod fixtures {
    pub const PING_4_REPLIES: &str = include_str!("../tests/fixtures/ping_4_replies.txt");
    pub const PING_UNRESOLVED: &str = include_str!("../tests/fixtures/ping_unresolved.txt");
    pub const PING_UNREACHABLE: &str = include_str!("../tests/fixtures/ping_unreachable.txt");
    pub const ROUTE_TABLE: &str = include_str!("../tests/fixtures/route_table.txt");
    pub const NETSTAT_SOCKETS: &str = include_str!("../tests/fixtures/netstat_sockets.txt");
    pub const IFCONFIG_TWO_BLOCKS: &str = include_str!("../tests/fixtures/ifconfig_two_blocks.txt");
    pub const IFCONFIG_NO_TRAILING_BLANK: &str =
        include_str!("../tests/fixtures/ifconfig_no_trailing_blank.txt");
}

pub fn default_params() -> Params {
    Params {
        ping_path: "/system/bin/ping".to_string(),
        netstat_path: "/system/bin/netstat".to_string(),
        ifconfig_path: "/system/bin/ifconfig".to_string(),
    }
}

pub fn default_builder() -> CommandBuilder {
    CommandBuilder::new(&default_params())
}

/// Answers every command with the same canned output and remembers what was asked.
#[derive(Clone, Default)]
pub struct FixtureRunner {
    output: Option<String>,
    exit_ok: bool,
    issued: Arc<Mutex<Vec<String>>>,
}

impl FixtureRunner {
    pub fn answering(output: &str) -> Self {
        FixtureRunner { output: Some(output.to_string()), exit_ok: true, ..Default::default() }
    }

    /// Prints `output`, then exits with a failure status.
    pub fn answering_then_failing(output: &str) -> Self {
        FixtureRunner { output: Some(output.to_string()), exit_ok: false, ..Default::default() }
    }

    /// Behaves like a tool that cannot be started at all.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }
}

impl CommandRunner for FixtureRunner {
    fn run(&self, cmd: &CommandLine, check: ExitCheck) -> DiagResult<String> {
        self.issued.lock().unwrap().push(cmd.to_string());
        let output = self.output.clone().ok_or_else(|| DiagError::Spawn {
            command: cmd.to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })?;
        if !self.exit_ok && check == ExitCheck::Strict {
            return Err(DiagError::Internal(format!("`{}` exited with exit status: 1", cmd)));
        }
        Ok(output)
    }
}
