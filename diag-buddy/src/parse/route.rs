use diag_models::RouteEntry;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::{group_str, group_u32, has_min_groups};

const ROUTE_TABLE_MIN_GROUPS: usize = 9;

lazy_static! {
    // Destination  Gateway  Genmask  Flags  Metric  Ref  Use  Iface
    static ref ROUTE_RE: Regex = Regex::new(
        r"(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\S+)"
    ).expect("route table regex");
}

/// One entry per table line, in output order. Headers and anything else are skipped.
pub fn parse_route_table(output: &str) -> Vec<RouteEntry> {
    output.lines()
        .filter_map(|line| ROUTE_RE.captures(line))
        .filter_map(|caps| extract_route(&caps))
        .collect()
}

fn extract_route(caps: &Captures) -> Option<RouteEntry> {
    if !has_min_groups(caps, ROUTE_TABLE_MIN_GROUPS, "Route table") {
        return None;
    }
    Some(RouteEntry {
        destination: group_str(caps, 1),
        gateway: group_str(caps, 2),
        mask: group_str(caps, 3),
        flags: group_str(caps, 4),
        metric: group_u32(caps, 5),
        ref_count: group_u32(caps, 6),
        use_count: group_u32(caps, 7),
        iface: group_str(caps, 8),
    })
}
