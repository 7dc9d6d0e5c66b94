pub use self::iface::{IfaceConfig, IFCONFIG_MAX_IPV6_ADDR_NUM};
pub use self::parcel::{Parcel, ParcelError, Parcelable};
pub use self::ping::{
    ForceType, IcmpResponse, PingOption, PingResult, ICMP_SEQ_LIST_MAX_SIZE,
    PING_MAX_DURATION_SECS,
};
pub use self::route::RouteEntry;
pub use self::sockets::{
    NetProtoSocketInfo, ProtocolType, SocketsInfo, UnixSocketInfo, SOCKET_INFO_LIST_MAX_SIZE,
};

pub mod iface;
/// Binary wire form shared with the IPC layer.
pub mod parcel;
pub mod ping;
pub mod route;
pub mod sockets;
