use serde::{Deserialize, Serialize};

use crate::parcel::{Parcel, ParcelResult, Parcelable};

pub const IFCONFIG_MAX_IPV6_ADDR_NUM: usize = 64;

/// Configuration & counters of a single network interface, in the terms of `ifconfig`.
/// Empty strings and zero numbers mean "not reported" or, for updates, "leave as is".
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfaceConfig {
    pub iface_name: String,
    pub link_encap: String,
    pub mac_addr: String,
    pub ipv4_addr: String,
    pub ipv4_bcast: String,
    pub ipv4_mask: String,
    /// (address, scope) pairs
    pub ipv6_addrs: Vec<(String, String)>,
    pub mtu: u32,
    pub tx_queue_len: u32,
    pub rx_bytes: u32,
    pub tx_bytes: u32,
    pub is_up: bool,
}

impl IfaceConfig {
    /// Whether nothing was set since construction or the last [IfaceConfig::reset].
    pub fn is_empty(&self) -> bool {
        *self == IfaceConfig::default()
    }

    pub fn reset(&mut self) {
        *self = IfaceConfig::default();
    }
}

impl Parcelable for IfaceConfig {
    fn marshal(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.iface_name);
        parcel.write_string(&self.link_encap);
        parcel.write_string(&self.mac_addr);
        parcel.write_string(&self.ipv4_addr);
        parcel.write_string(&self.ipv4_bcast);
        parcel.write_string(&self.ipv4_mask);
        parcel.write_capped_list(&self.ipv6_addrs, IFCONFIG_MAX_IPV6_ADDR_NUM);
        parcel.write_u32(self.mtu);
        parcel.write_u32(self.tx_queue_len);
        parcel.write_u32(self.rx_bytes);
        parcel.write_u32(self.tx_bytes);
        parcel.write_bool(self.is_up);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        Ok(IfaceConfig {
            iface_name: parcel.read_string()?,
            link_encap: parcel.read_string()?,
            mac_addr: parcel.read_string()?,
            ipv4_addr: parcel.read_string()?,
            ipv4_bcast: parcel.read_string()?,
            ipv4_mask: parcel.read_string()?,
            ipv6_addrs: parcel.read_capped_list(IFCONFIG_MAX_IPV6_ADDR_NUM)?,
            mtu: parcel.read_u32()?,
            tx_queue_len: parcel.read_u32()?,
            rx_bytes: parcel.read_u32()?,
            tx_bytes: parcel.read_u32()?,
            is_up: parcel.read_bool()?,
        })
    }
}
