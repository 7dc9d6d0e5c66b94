use anyhow::{Context, Result};
use clap::Args;
use diag_models::ProtocolType;

use diag_buddy::diag_call::NetDiagWrapper;

#[derive(Args, Clone)]
pub struct Params {
    /// One of all, tcp, udp, unix, raw
    #[arg(default_value = "all")]
    protocol: ProtocolType,
}

pub fn handle(params: Params, wrapper: &NetDiagWrapper) -> Result<()> {
    let info = wrapper.get_sockets_info(params.protocol)
        .with_context(|| format!("Failed to list {} sockets", params.protocol))?;
    super::print_json(&info)
}
