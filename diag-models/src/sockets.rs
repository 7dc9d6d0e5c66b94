use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr};

use crate::parcel::{Parcel, ParcelError, ParcelResult, Parcelable};

pub const SOCKET_INFO_LIST_MAX_SIZE: usize = 1024;

/// Which kind of sockets to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, FromRepr)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum ProtocolType {
    All = 0,
    Tcp = 1,
    Udp = 2,
    Unix = 3,
    Raw = 4,
}

impl TryFrom<u8> for ProtocolType {
    type Error = ParcelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ProtocolType::from_repr(value).ok_or(ParcelError::UnknownTag { kind: "protocol type", value })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnixSocketInfo {
    pub ref_cnt: u16,
    pub inode: u32,
    pub protocol: String,
    pub flags: String,
    pub socket_type: String,
    pub state: String,
    pub path: String,
}

impl Parcelable for UnixSocketInfo {
    fn marshal(&self, parcel: &mut Parcel) {
        parcel.write_u16(self.ref_cnt);
        parcel.write_u32(self.inode);
        parcel.write_string(&self.protocol);
        parcel.write_string(&self.flags);
        parcel.write_string(&self.socket_type);
        parcel.write_string(&self.state);
        parcel.write_string(&self.path);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        Ok(UnixSocketInfo {
            ref_cnt: parcel.read_u16()?,
            inode: parcel.read_u32()?,
            protocol: parcel.read_string()?,
            flags: parcel.read_string()?,
            socket_type: parcel.read_string()?,
            state: parcel.read_string()?,
            path: parcel.read_string()?,
        })
    }
}

/// A TCP, UDP or raw socket.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetProtoSocketInfo {
    pub protocol: String,
    pub local_addr: String,
    pub foreign_addr: String,
    pub state: String,
    pub user: String,
    pub program_name: String,
    pub recv_queue: u16,
    pub send_queue: u16,
    pub inode: u32,
}

impl Parcelable for NetProtoSocketInfo {
    fn marshal(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.protocol);
        parcel.write_string(&self.local_addr);
        parcel.write_string(&self.foreign_addr);
        parcel.write_string(&self.state);
        parcel.write_string(&self.user);
        parcel.write_string(&self.program_name);
        parcel.write_u16(self.recv_queue);
        parcel.write_u16(self.send_queue);
        parcel.write_u32(self.inode);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        Ok(NetProtoSocketInfo {
            protocol: parcel.read_string()?,
            local_addr: parcel.read_string()?,
            foreign_addr: parcel.read_string()?,
            state: parcel.read_string()?,
            user: parcel.read_string()?,
            program_name: parcel.read_string()?,
            recv_queue: parcel.read_u16()?,
            send_queue: parcel.read_u16()?,
            inode: parcel.read_u32()?,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketsInfo {
    pub unix_sockets: Vec<UnixSocketInfo>,
    pub net_proto_sockets: Vec<NetProtoSocketInfo>,
}

impl Parcelable for SocketsInfo {
    fn marshal(&self, parcel: &mut Parcel) {
        parcel.write_capped_list(&self.unix_sockets, SOCKET_INFO_LIST_MAX_SIZE);
        parcel.write_capped_list(&self.net_proto_sockets, SOCKET_INFO_LIST_MAX_SIZE);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        Ok(SocketsInfo {
            unix_sockets: parcel.read_capped_list(SOCKET_INFO_LIST_MAX_SIZE)?,
            net_proto_sockets: parcel.read_capped_list(SOCKET_INFO_LIST_MAX_SIZE)?,
        })
    }
}
