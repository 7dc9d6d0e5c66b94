use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use diag_models::IfaceConfig;
use log::info;

use diag_buddy::diag_call::NetDiagWrapper;

#[derive(Args, Clone)]
pub struct ConfigParams {
    /// Interface to show, all of them if omitted
    iface_name: Option<String>,
}

pub fn handle_config(params: ConfigParams, wrapper: &NetDiagWrapper) -> Result<()> {
    let iface_name = params.iface_name.unwrap_or_default();
    let configs = wrapper.get_interface_config(&iface_name)
        .context("Failed to read interface configuration")?;
    super::print_json(&configs)
}

#[derive(Args, Clone)]
pub struct UpdateParams {
    iface_name: String,

    /// Remove the given addresses instead of adding them
    #[arg(long)]
    remove: bool,

    #[arg(long, default_value = "")]
    ipv4_addr: String,

    #[arg(long, default_value = "")]
    bcast: String,

    #[arg(long, default_value = "")]
    mask: String,

    /// May be repeated
    #[arg(long = "ipv6-addr")]
    ipv6_addrs: Vec<String>,

    #[arg(long, default_value = "0")]
    mtu: u32,

    #[arg(long, default_value = "0")]
    tx_queue_len: u32,
}

impl UpdateParams {
    fn to_config(&self) -> IfaceConfig {
        IfaceConfig {
            iface_name: self.iface_name.to_string(),
            ipv4_addr: self.ipv4_addr.to_string(),
            ipv4_bcast: self.bcast.to_string(),
            ipv4_mask: self.mask.to_string(),
            ipv6_addrs: self.ipv6_addrs.iter()
                .map(|addr| (addr.to_string(), String::new()))
                .collect(),
            mtu: self.mtu,
            tx_queue_len: self.tx_queue_len,
            ..Default::default()
        }
    }
}

pub fn handle_update(params: UpdateParams, wrapper: &NetDiagWrapper) -> Result<()> {
    let config = params.to_config();
    wrapper.update_interface_config(&config, &params.iface_name, !params.remove)
        .with_context(|| format!("Failed to update interface {}", params.iface_name))?;
    info!("Updated interface {}", params.iface_name);
    Ok(())
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveState {
    Up,
    Down,
}

#[derive(Args, Clone)]
pub struct StateParams {
    iface_name: String,

    #[arg(value_enum)]
    state: ActiveState,
}

pub fn handle_state(params: StateParams, wrapper: &NetDiagWrapper) -> Result<()> {
    let up = params.state == ActiveState::Up;
    wrapper.set_interface_active_state(&params.iface_name, up)
        .with_context(|| format!("Failed to set interface {} {:?}", params.iface_name, params.state))?;
    info!("Interface {} is now {:?}", params.iface_name, params.state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use assertor::*;
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[clap(flatten)]
        update: UpdateParams,
    }

    #[test]
    fn update_flags_map_to_config() {
        // given
        let cli = TestCli::parse_from([
            "test", "eth0", "--ipv4-addr", "10.0.0.2", "--mask", "255.255.255.0",
            "--ipv6-addr", "fd00::2/64", "--ipv6-addr", "fd00::3/64", "--mtu", "1280",
        ]);

        // when
        let config = cli.update.to_config();

        // then
        assert_that!(config.ipv4_addr.clone()).is_equal_to("10.0.0.2".to_string());
        assert_that!(config.ipv4_mask.clone()).is_equal_to("255.255.255.0".to_string());
        assert_that!(config.ipv6_addrs).has_length(2);
        assert_that!(config.mtu).is_equal_to(1280);
        assert_that!(cli.update.remove).is_false();
    }
}
