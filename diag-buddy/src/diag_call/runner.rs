use std::process::{Command, Stdio};

use log::{debug, warn};

use super::{CommandLine, DiagError, DiagResult};

/// What a failure exit status of a tool that did run means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCheck {
    /// Output is returned regardless. `ping` exits non-zero on lost packets and
    /// unresolved names, and still prints what it saw.
    Lenient,
    /// A failure status is an error. Used for commands that change system state.
    Strict,
}

/// Executes a [CommandLine] and hands back everything it printed to stdout.
///
/// This is the seam between command construction and the operating system, so that
/// parsing and threading can be exercised against recorded output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, cmd: &CommandLine, check: ExitCheck) -> DiagResult<String>;
}

/// Forks the binary directly (no shell involved) and waits for it to exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForkExecRunner;

impl CommandRunner for ForkExecRunner {
    fn run(&self, cmd: &CommandLine, check: ExitCheck) -> DiagResult<String> {
        if cmd.is_empty() {
            return Err(DiagError::Internal("refusing to run an empty command".to_string()));
        }
        debug!("Calling {}", cmd);

        let output = Command::new(cmd.program())
            .args(cmd.args())
            // output is parsed, so it must not be localised
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| DiagError::Spawn { command: cmd.to_string(), source })?;

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!(" #[{}]# {}", cmd.program(), line);
        }

        if output.status.success() {
            debug!("{} call exited successfully", cmd.program());
        } else {
            warn!("`{}` exited with non-successful status {:?}", cmd, output.status);
            if check == ExitCheck::Strict {
                return Err(DiagError::Internal(format!("`{}` exited with {}", cmd, output.status)));
            }
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
