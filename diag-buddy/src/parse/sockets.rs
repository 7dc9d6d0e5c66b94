use diag_models::{NetProtoSocketInfo, SocketsInfo, UnixSocketInfo};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::{group_str, group_u16, group_u32, has_min_groups};

const NET_PROTOCOL_MIN_GROUPS: usize = 10;
const UNIX_MIN_GROUPS: usize = 8;

lazy_static! {
    // Proto Recv-Q Send-Q Local Foreign [State] User Inode PID/Program
    static ref NET_PROTO_RE: Regex = Regex::new(
        r"(\S+)\s+(\d+)\s+(\d+)\s+(\S+)\s+(\S+)\s*(\S*)\s+(\S+)\s+(\d+)\s+(\S+)"
    ).expect("net protocol socket regex");

    // Proto RefCnt [ Flags ] Type [State] I-Node [Path]
    static ref UNIX_RE: Regex = Regex::new(
        r"(\S+)\s+(\d+)\s+\[\s*(\S*)\s+\]\s+(\S+)\s*(\S*)\s+(\d+)\s*(\S*)"
    ).expect("unix socket regex");
}

/// Sorts each recognisable line into the matching list. Lines shaped like an internet
/// socket take precedence over the unix shape.
pub fn parse_sockets_info(output: &str) -> SocketsInfo {
    let mut info = SocketsInfo::default();
    for line in output.lines() {
        if let Some(caps) = NET_PROTO_RE.captures(line) {
            if has_min_groups(&caps, NET_PROTOCOL_MIN_GROUPS, "Net protocol socket") {
                info.net_proto_sockets.push(extract_net_proto(&caps));
            }
        } else if let Some(caps) = UNIX_RE.captures(line) {
            if has_min_groups(&caps, UNIX_MIN_GROUPS, "Unix socket") {
                info.unix_sockets.push(extract_unix(&caps));
            }
        }
    }
    info
}

fn extract_net_proto(caps: &Captures) -> NetProtoSocketInfo {
    NetProtoSocketInfo {
        protocol: group_str(caps, 1),
        recv_queue: group_u16(caps, 2),
        send_queue: group_u16(caps, 3),
        local_addr: group_str(caps, 4),
        foreign_addr: group_str(caps, 5),
        state: group_str(caps, 6),
        user: group_str(caps, 7),
        inode: group_u32(caps, 8),
        program_name: group_str(caps, 9),
    }
}

fn extract_unix(caps: &Captures) -> UnixSocketInfo {
    UnixSocketInfo {
        protocol: group_str(caps, 1),
        ref_cnt: group_u16(caps, 2),
        flags: group_str(caps, 3),
        socket_type: group_str(caps, 4),
        state: group_str(caps, 5),
        inode: group_u32(caps, 6),
        path: group_str(caps, 7),
    }
}
