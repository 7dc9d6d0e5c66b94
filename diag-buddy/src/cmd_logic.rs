use anyhow::{Context, Result};
use clap::Subcommand;
use log::debug;
use serde::Serialize;

use diag_buddy::diag_call;

pub mod iface;
pub mod ping;
pub mod route_table;
pub mod sockets;

pub fn handle(cmd: Commands, diag: &diag_call::Params) -> Result<()> {
    let wrapper = diag.to_wrapper();
    let command_result = match cmd {
        Commands::Ping(params) => ping::handle(params, wrapper),
        Commands::RouteTable => route_table::handle(&wrapper),
        Commands::Sockets(params) => sockets::handle(params, &wrapper),
        Commands::IfaceConfig(params) => iface::handle_config(params, &wrapper),
        Commands::IfaceUpdate(params) => iface::handle_update(params, &wrapper),
        Commands::IfaceState(params) => iface::handle_state(params, &wrapper),
    };
    debug!("Finished command execution. Result: {:?}", command_result);
    command_result
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ping a host in the background and print the result once it is in.
    Ping(ping::Params),

    /// Print the kernel routing table.
    RouteTable,

    /// List open sockets of one or all protocols.
    Sockets(sockets::Params),

    /// Show configuration and counters of one or all interfaces.
    IfaceConfig(iface::ConfigParams),

    /// Add addresses & settings to an interface, or remove its addresses again.
    IfaceUpdate(iface::UpdateParams),

    /// Bring an interface up or down.
    IfaceState(iface::StateParams),
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .context("Failed to render result as JSON")?;
    println!("{}", rendered);
    Ok(())
}
