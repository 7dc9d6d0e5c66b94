use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr};

use crate::parcel::{Parcel, ParcelError, ParcelResult, Parcelable};

pub const ICMP_SEQ_LIST_MAX_SIZE: usize = 1024;
pub const PING_MAX_DURATION_SECS: u16 = 30;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromRepr)]
#[repr(u8)]
pub enum ForceType {
    #[default]
    #[strum(serialize = "IPv4")]
    Ipv4 = 0,
    #[strum(serialize = "IPv6")]
    Ipv6 = 1,
}

impl TryFrom<u8> for ForceType {
    type Error = ParcelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ForceType::from_repr(value).ok_or(ParcelError::UnknownTag { kind: "force type", value })
    }
}

/// Parameters of a single ping run. Numeric fields left at zero are not passed to
/// the ping binary at all, so its own defaults apply.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingOption {
    pub force_type: ForceType,
    /// Host name or address to ping. Required.
    pub destination: String,
    /// Source address or interface name
    pub source: String,
    pub interval_ms: u32,
    pub count: u16,
    pub data_size: u16,
    pub mark: u16,
    pub ttl: u16,
    pub timeout_secs: u16,
    /// Overall deadline of the run, see [PingOption::effective_duration_secs]
    pub duration_secs: u16,
    pub flood: bool,
}

impl PingOption {
    pub fn to(destination: impl Into<String>) -> Self {
        PingOption { destination: destination.into(), ..Default::default() }
    }

    /// Ping never runs longer than [PING_MAX_DURATION_SECS]; zero means "as long as allowed".
    pub fn effective_duration_secs(&self) -> u16 {
        match self.duration_secs {
            0 => PING_MAX_DURATION_SECS,
            secs => secs.min(PING_MAX_DURATION_SECS),
        }
    }
}

impl Parcelable for PingOption {
    fn marshal(&self, parcel: &mut Parcel) {
        parcel.write_u8(self.force_type as u8);
        parcel.write_string(&self.destination);
        parcel.write_string(&self.source);
        parcel.write_u32(self.interval_ms);
        parcel.write_u16(self.count);
        parcel.write_u16(self.data_size);
        parcel.write_u16(self.mark);
        parcel.write_u16(self.ttl);
        parcel.write_u16(self.timeout_secs);
        parcel.write_u16(self.duration_secs);
        parcel.write_bool(self.flood);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        Ok(PingOption {
            force_type: ForceType::try_from(parcel.read_u8()?)?,
            destination: parcel.read_string()?,
            source: parcel.read_string()?,
            interval_ms: parcel.read_u32()?,
            count: parcel.read_u16()?,
            data_size: parcel.read_u16()?,
            mark: parcel.read_u16()?,
            ttl: parcel.read_u16()?,
            timeout_secs: parcel.read_u16()?,
            duration_secs: parcel.read_u16()?,
            flood: parcel.read_bool()?,
        })
    }
}

/// One echo reply line of the ping output.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmpResponse {
    pub bytes: u16,
    pub icmp_seq: u16,
    pub ttl: u16,
    pub cost_time_ms: u32,
    pub from: String,
}

impl Parcelable for IcmpResponse {
    fn marshal(&self, parcel: &mut Parcel) {
        parcel.write_u16(self.bytes);
        parcel.write_u16(self.icmp_seq);
        parcel.write_u16(self.ttl);
        parcel.write_u32(self.cost_time_ms);
        parcel.write_string(&self.from);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        Ok(IcmpResponse {
            bytes: parcel.read_u16()?,
            icmp_seq: parcel.read_u16()?,
            ttl: parcel.read_u16()?,
            cost_time_ms: parcel.read_u32()?,
            from: parcel.read_string()?,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResult {
    pub host: String,
    pub ip_addr: String,
    pub data_size: u16,
    pub payload_size: u16,
    pub trans_count: u16,
    pub recv_count: u16,
    /// Unbounded in memory, only the first [ICMP_SEQ_LIST_MAX_SIZE] are put on the wire.
    pub responses: Vec<IcmpResponse>,
}

impl Parcelable for PingResult {
    fn marshal(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.host);
        parcel.write_string(&self.ip_addr);
        parcel.write_u16(self.data_size);
        parcel.write_u16(self.payload_size);
        parcel.write_u16(self.trans_count);
        parcel.write_u16(self.recv_count);
        parcel.write_capped_list(&self.responses, ICMP_SEQ_LIST_MAX_SIZE);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        Ok(PingResult {
            host: parcel.read_string()?,
            ip_addr: parcel.read_string()?,
            data_size: parcel.read_u16()?,
            payload_size: parcel.read_u16()?,
            trans_count: parcel.read_u16()?,
            recv_count: parcel.read_u16()?,
            responses: parcel.read_capped_list(ICMP_SEQ_LIST_MAX_SIZE)?,
        })
    }
}
