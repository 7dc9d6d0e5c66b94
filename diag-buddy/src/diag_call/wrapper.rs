use std::sync::Arc;
use std::thread;

use diag_models::{IfaceConfig, PingOption, ProtocolType, RouteEntry, SocketsInfo};
use log::{debug, error, info, warn};

use crate::parse;

use super::{
    CommandBuilder, CommandLine, CommandRunner, DiagError, DiagResult, ExitCheck, NetDiagCallback,
};

const PING_THREAD_NAME: &str = "NetDiagPingThread";

/// Runs the system diagnostic tools and turns their output into typed records.
///
/// Holds no state besides its configuration, so a single instance can serve any number
/// of concurrent calls. Ping runs on its own worker thread, which is why [Self::ping_host]
/// needs the instance behind an [Arc].
pub struct NetDiagWrapper {
    commands: CommandBuilder,
    runner: Box<dyn CommandRunner>,
}

impl NetDiagWrapper {
    pub fn new(commands: CommandBuilder, runner: impl CommandRunner + 'static) -> Self {
        NetDiagWrapper { commands, runner: Box::new(runner) }
    }

    /// Starts a ping run in the background and returns as soon as it was started.
    ///
    /// The callback is invoked exactly once if the run produced output, even when ping
    /// reported lost packets or an unresolvable host, and never if it could not be run. Runs cannot be cancelled; the duration flag passed to ping bounds them.
    pub fn ping_host(
        self: &Arc<Self>,
        option: &PingOption,
        callback: Arc<dyn NetDiagCallback>,
    ) -> DiagResult<()> {
        let cmd = self.commands.build_ping_command(option)?;
        let this = Arc::clone(self);
        thread::Builder::new()
            .name(PING_THREAD_NAME.to_string())
            .spawn(move || this.run_ping(&cmd, callback.as_ref()))
            .map_err(|e| DiagError::Internal(format!("failed to spawn ping thread: {}", e)))?;
        Ok(())
    }

    fn run_ping(&self, cmd: &CommandLine, callback: &dyn NetDiagCallback) {
        let output = match self.runner.run(cmd, ExitCheck::Lenient) {
            Ok(output) => output,
            Err(e) => {
                error!("Ping failed, not notifying: {:?}", e);
                return;
            }
        };
        if output.is_empty() {
            error!("Ping result is empty, not notifying.");
            return;
        }
        let result = parse::ping::parse_ping_output(&output);
        info!(
            "Ping to {} done: {} transmitted, {} received",
            result.host, result.trans_count, result.recv_count,
        );
        if let Err(e) = callback.on_notify_ping_result(result) {
            warn!("Notify ping result failed: {:?}", e);
        }
    }

    pub fn get_route_table(&self) -> DiagResult<Vec<RouteEntry>> {
        let cmd = self.commands.build_route_table_command();
        let output = self.runner.run(&cmd, ExitCheck::Lenient)?;
        let routes = parse::route::parse_route_table(&output);
        debug!("Parsed {} route entries", routes.len());
        Ok(routes)
    }

    pub fn get_sockets_info(&self, protocol: ProtocolType) -> DiagResult<SocketsInfo> {
        let cmd = self.commands.build_sockets_command(protocol);
        let output = self.runner.run(&cmd, ExitCheck::Lenient)?;
        let info = parse::sockets::parse_sockets_info(&output);
        debug!(
            "Parsed {} unix and {} net protocol sockets",
            info.unix_sockets.len(), info.net_proto_sockets.len(),
        );
        Ok(info)
    }

    /// Like [Self::get_sockets_info], for callers that only hold the numeric protocol code.
    pub fn get_sockets_info_for_code(&self, code: u8) -> DiagResult<SocketsInfo> {
        let protocol = ProtocolType::try_from(code)
            .map_err(|e| DiagError::Internal(e.to_string()))?;
        self.get_sockets_info(protocol)
    }

    /// An empty `iface_name` lists every interface.
    pub fn get_interface_config(&self, iface_name: &str) -> DiagResult<Vec<IfaceConfig>> {
        let cmd = self.commands.build_interface_config_command(iface_name);
        let output = self.runner.run(&cmd, ExitCheck::Lenient)?;
        Ok(parse::iface::parse_iface_configs(&output))
    }

    /// Fails if `ifconfig` reports failure; does not check whether the change took effect.
    pub fn update_interface_config(&self, config: &IfaceConfig, iface_name: &str, add: bool) -> DiagResult<()> {
        let cmd = self.commands.build_interface_update_command(config, iface_name, add)?;
        self.runner.run(&cmd, ExitCheck::Strict)?;
        Ok(())
    }

    pub fn set_interface_active_state(&self, iface_name: &str, up: bool) -> DiagResult<()> {
        let cmd = self.commands.build_interface_active_state_command(iface_name, up)?;
        self.runner.run(&cmd, ExitCheck::Strict)?;
        Ok(())
    }
}
