use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use diag_models::{ForceType, PingOption};
use log::info;

use diag_buddy::diag_call::{ChannelCallback, NetDiagWrapper};

/// Time allowed on top of the ping deadline for the process to exit and be parsed.
const RESULT_GRACE_SECS: u64 = 5;

#[derive(Args, Clone)]
pub struct Params {
    /// Host name or address to ping
    destination: String,

    /// Force IPv6 (IPv4 otherwise)
    #[arg(short = '6', long)]
    ipv6: bool,

    /// Source address or interface to send from
    #[arg(short = 'I', long, default_value = "")]
    source: String,

    /// Wait between packets, in milliseconds
    #[arg(short, long, default_value = "0")]
    interval_ms: u32,

    /// Stop after this many replies
    #[arg(short, long, default_value = "0")]
    count: u16,

    /// Payload bytes per packet
    #[arg(short = 's', long, default_value = "0")]
    data_size: u16,

    /// Tag outgoing packets with this fwmark
    #[arg(short, long, default_value = "0")]
    mark: u16,

    #[arg(short, long, default_value = "0")]
    ttl: u16,

    /// Seconds to wait for each reply
    #[arg(short = 'W', long, default_value = "0")]
    timeout_secs: u16,

    /// Deadline for the whole run in seconds, capped at 30
    #[arg(short = 'w', long, default_value = "0")]
    duration_secs: u16,

    #[arg(short, long)]
    flood: bool,
}

impl Params {
    fn to_option(&self) -> PingOption {
        PingOption {
            force_type: if self.ipv6 { ForceType::Ipv6 } else { ForceType::Ipv4 },
            destination: self.destination.to_string(),
            source: self.source.to_string(),
            interval_ms: self.interval_ms,
            count: self.count,
            data_size: self.data_size,
            mark: self.mark,
            ttl: self.ttl,
            timeout_secs: self.timeout_secs,
            duration_secs: self.duration_secs,
            flood: self.flood,
        }
    }
}

pub fn handle(params: Params, wrapper: NetDiagWrapper) -> Result<()> {
    let option = params.to_option();
    let wrapper = Arc::new(wrapper);
    let (callback, rx) = ChannelCallback::new();

    wrapper.ping_host(&option, Arc::new(callback))
        .with_context(|| format!("Failed to start pinging {}", option.destination))?;
    info!("Pinging {} ({}) in the background", option.destination, option.force_type);

    let wait_secs = option.effective_duration_secs() as u64 + RESULT_GRACE_SECS;
    match rx.recv_timeout(Duration::from_secs(wait_secs)) {
        Ok(result) => super::print_json(&result),
        Err(RecvTimeoutError::Disconnected) => {
            bail!("Ping of {} produced no result, see the log for why", option.destination)
        }
        Err(RecvTimeoutError::Timeout) => {
            bail!("No ping result for {} within {} seconds", option.destination, wait_secs)
        }
    }
}
