use serde::{Deserialize, Serialize};

use crate::parcel::{Parcel, ParcelResult, Parcelable};

/// One line of the kernel routing table as reported by `netstat -re`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub destination: String,
    pub gateway: String,
    pub mask: String,
    pub iface: String,
    pub flags: String,
    pub metric: u32,
    pub ref_count: u32,
    pub use_count: u32,
}

impl Parcelable for RouteEntry {
    fn marshal(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.destination);
        parcel.write_string(&self.gateway);
        parcel.write_string(&self.mask);
        parcel.write_string(&self.iface);
        parcel.write_string(&self.flags);
        parcel.write_u32(self.metric);
        parcel.write_u32(self.ref_count);
        parcel.write_u32(self.use_count);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        Ok(RouteEntry {
            destination: parcel.read_string()?,
            gateway: parcel.read_string()?,
            mask: parcel.read_string()?,
            iface: parcel.read_string()?,
            flags: parcel.read_string()?,
            metric: parcel.read_u32()?,
            ref_count: parcel.read_u32()?,
            use_count: parcel.read_u32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use assertor::*;

    use super::*;

    #[test]
    fn route_table_survives_wire() {
        // given
        let table = vec![
            RouteEntry {
                destination: "default".to_string(),
                gateway: "192.168.1.1".to_string(),
                mask: "0.0.0.0".to_string(),
                iface: "wlan0".to_string(),
                flags: "UG".to_string(),
                metric: 600,
                ref_count: 0,
                use_count: 0,
            },
            RouteEntry {
                destination: "192.168.1.0".to_string(),
                mask: "255.255.255.0".to_string(),
                iface: "wlan0".to_string(),
                flags: "U".to_string(),
                use_count: u32::MAX,
                ..Default::default()
            },
        ];
        let mut parcel = Parcel::new();

        // when
        parcel.write_list(&table);
        let decoded: Vec<RouteEntry> = Parcel::from_bytes(parcel.into_bytes()).read_list().unwrap();

        // then
        assert_that!(decoded).is_equal_to(table);
    }
}
