use diag_models::{IcmpResponse, PingResult};
use lazy_static::lazy_static;
use log::{trace, warn};
use regex::{Captures, Regex};

use super::{group_str, group_u16, group_u32, has_min_groups};

/// Lines that mean no further useful output will follow.
const FAILURE_MARKERS: [&str; 2] = ["Name does not resolve", "Network unreachable"];

const PING_HEADER_MIN_GROUPS: usize = 5;
const PING_ICMP_SEQ_MIN_GROUPS: usize = 6;
const PING_STATISTICS_MIN_GROUPS: usize = 4;

lazy_static! {
    // PING 127.0.0.1 (127.0.0.1): 56(84) bytes of data.
    static ref HEADER_RE: Regex = Regex::new(
        r"(?i)ping\s+([^(\s]+)\s*\(([^)]+)\):?\s+(\d+)\((\d+)\)\s+bytes"
    ).expect("ping header regex");

    // 64 bytes from 127.0.0.1: icmp_seq=1 ttl=64 time=0.052 ms
    static ref ICMP_SEQ_RE: Regex = Regex::new(
        r"(\d+)\s+bytes\s+from\s+(\S+?)(?:\s+\([^)]*\))?:\s+icmp_seq=(\d+)\s+ttl=(\d+)\s+time=(\d+)(?:\.\d+)?\s*ms"
    ).expect("ping reply regex");

    // 4 packets transmitted, 4 received, 0% packet loss, time 3004ms
    static ref STATISTICS_RE: Regex = Regex::new(
        r"(\d+)\s+packets\s+transmitted,\s+(\d+)\s+(?:packets\s+)?received,\s+(?:\+\d+\s+(?:duplicates|errors),\s+)*(\d+)(?:\.\d+)?%\s+packet\s+loss"
    ).expect("ping statistics regex");
}

/// Collects whatever the output reveals, up to the statistics line or the first sign of failure.
///
/// Round-trip times are truncated to whole milliseconds.
pub fn parse_ping_output(output: &str) -> PingResult {
    let mut result = PingResult::default();
    for line in output.lines() {
        if FAILURE_MARKERS.iter().any(|marker| line.contains(marker)) {
            warn!("Ping did not complete: {}", line.trim());
            break;
        }
        if let Some(caps) = HEADER_RE.captures(line) {
            extract_header(&caps, &mut result);
        } else if let Some(caps) = ICMP_SEQ_RE.captures(line) {
            extract_response(&caps, &mut result);
        } else if let Some(caps) = STATISTICS_RE.captures(line) {
            extract_statistics(&caps, &mut result);
            break;
        } else {
            trace!("Skipping ping output line: {}", line);
        }
    }
    result
}

fn extract_header(caps: &Captures, result: &mut PingResult) {
    if !has_min_groups(caps, PING_HEADER_MIN_GROUPS, "Ping header") {
        return;
    }
    result.host = group_str(caps, 1);
    result.ip_addr = group_str(caps, 2);
    result.data_size = group_u16(caps, 3);
    result.payload_size = group_u16(caps, 4);
}

fn extract_response(caps: &Captures, result: &mut PingResult) {
    if !has_min_groups(caps, PING_ICMP_SEQ_MIN_GROUPS, "Ping reply") {
        return;
    }
    result.responses.push(IcmpResponse {
        bytes: group_u16(caps, 1),
        from: group_str(caps, 2),
        icmp_seq: group_u16(caps, 3),
        ttl: group_u16(caps, 4),
        cost_time_ms: group_u32(caps, 5),
    });
}

fn extract_statistics(caps: &Captures, result: &mut PingResult) {
    if !has_min_groups(caps, PING_STATISTICS_MIN_GROUPS, "Ping statistics") {
        return;
    }
    result.trans_count = group_u16(caps, 1);
    result.recv_count = group_u16(caps, 2);
}
