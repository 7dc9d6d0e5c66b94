use diag_models::IfaceConfig;
use lazy_static::lazy_static;
use log::trace;
use regex::{Captures, Regex};

use super::{group_str, group_u32, has_min_groups, is_blank};

const IFACE_NAME_MIN_GROUPS: usize = 3;
const INET_MIN_GROUPS: usize = 2;
const INET6_MIN_GROUPS: usize = 3;
const MTU_MIN_GROUPS: usize = 2;
const TX_QUEUE_LEN_MIN_GROUPS: usize = 2;
const BYTES_MIN_GROUPS: usize = 3;

lazy_static! {
    // wlan0  Link encap:Ethernet  HWaddr 02:00:00:44:55:66
    // lo     Link encap:Local Loopback
    static ref NAME_RE: Regex = Regex::new(
        r"(\S+)\s+Link encap:(\S+)\s+HWaddr\s+(\S+)|(\S+)\s+Link encap:(.*)"
    ).expect("interface name regex");

    static ref INET_RE: Regex = Regex::new(
        r"inet addr:(\S+)(?:\s+Bcast:(\S+))?(?:\s+Mask:(\S+))?"
    ).expect("inet regex");

    static ref INET6_RE: Regex = Regex::new(
        r"inet6 addr:\s*(\S+)\s+Scope:\s*(\S+)"
    ).expect("inet6 regex");

    // UP BROADCAST RUNNING MULTICAST  MTU:1500  Metric:1
    static ref MTU_RE: Regex = Regex::new(
        r"(?:\b(UP)\b.*?)?MTU:(\d+)"
    ).expect("mtu regex");

    static ref TX_QUEUE_LEN_RE: Regex = Regex::new(
        r"txqueuelen:(\d+)"
    ).expect("txqueuelen regex");

    // RX bytes:2048000 (1.9 MiB)  TX bytes:512000 (500.0 KiB)
    static ref BYTES_RE: Regex = Regex::new(
        r"RX bytes:(\d+)(?:\s+\([^)]*\))?\s+TX bytes:(\d+)"
    ).expect("rx/tx bytes regex");
}

/// Splits `ifconfig` output into one record per interface block.
///
/// Blocks are separated by blank lines. The last block is kept even if the output does
/// not end in a blank line. IPv6 addresses are recognised but not recorded.
pub fn parse_iface_configs(output: &str) -> Vec<IfaceConfig> {
    let mut configs = vec![];
    let mut current = IfaceConfig::default();
    for line in output.lines() {
        if is_blank(line) {
            flush(&mut current, &mut configs);
            continue;
        }
        apply_line(line, &mut current);
    }
    flush(&mut current, &mut configs);
    configs
}

fn flush(current: &mut IfaceConfig, configs: &mut Vec<IfaceConfig>) {
    if !current.is_empty() {
        configs.push(std::mem::take(current));
    }
}

fn apply_line(line: &str, config: &mut IfaceConfig) {
    if let Some(caps) = NAME_RE.captures(line) {
        extract_name(&caps, config);
    } else if let Some(caps) = INET_RE.captures(line) {
        extract_inet(&caps, config);
    } else if let Some(caps) = INET6_RE.captures(line) {
        if has_min_groups(&caps, INET6_MIN_GROUPS, "Interface inet6") {
            trace!("Not recording IPv6 address {} (scope {})", &caps[1], &caps[2]);
        }
    } else if let Some(caps) = MTU_RE.captures(line) {
        extract_mtu(&caps, config);
    } else if let Some(caps) = TX_QUEUE_LEN_RE.captures(line) {
        if has_min_groups(&caps, TX_QUEUE_LEN_MIN_GROUPS, "Interface txqueuelen") {
            config.tx_queue_len = group_u32(&caps, 1);
        }
    } else if let Some(caps) = BYTES_RE.captures(line) {
        if has_min_groups(&caps, BYTES_MIN_GROUPS, "Interface bytes") {
            config.rx_bytes = group_u32(&caps, 1);
            config.tx_bytes = group_u32(&caps, 2);
        }
    }
}

fn extract_name(caps: &Captures, config: &mut IfaceConfig) {
    if !has_min_groups(caps, IFACE_NAME_MIN_GROUPS, "Interface name") {
        return;
    }
    if caps.get(1).is_some() {
        config.iface_name = group_str(caps, 1);
        config.link_encap = group_str(caps, 2);
        config.mac_addr = group_str(caps, 3);
    } else {
        config.iface_name = group_str(caps, 4);
        config.link_encap = group_str(caps, 5).trim().to_string();
        config.mac_addr = String::new();
    }
}

fn extract_inet(caps: &Captures, config: &mut IfaceConfig) {
    if !has_min_groups(caps, INET_MIN_GROUPS, "Interface inet") {
        return;
    }
    config.ipv4_addr = group_str(caps, 1);
    if caps.get(2).is_some() {
        config.ipv4_bcast = group_str(caps, 2);
    }
    if caps.get(3).is_some() {
        config.ipv4_mask = group_str(caps, 3);
    }
}

fn extract_mtu(caps: &Captures, config: &mut IfaceConfig) {
    if !has_min_groups(caps, MTU_MIN_GROUPS, "Interface mtu") {
        return;
    }
    config.is_up = caps.get(1).is_some();
    config.mtu = group_u32(caps, 2);
}
