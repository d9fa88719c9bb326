use std::net::Ipv4Addr;

use mac_address::MacAddress;
use uuid::Uuid;

/// Fixed prefix of the bridge UUID; the last 48 bits are the hardware address
const BRIDGE_UUID_PREFIX: u128 = 0x2f40_2f80_da50_11e1_9b23_0000_0000_0000;

/// Network identity of the emulated bridge, as seen by discovery clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostIdentity {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub mac: MacAddress,
}

impl HostIdentity {
    #[must_use]
    pub const fn new(ip: Ipv4Addr, port: u16, mac: MacAddress) -> Self {
        Self { ip, port, mac }
    }

    /// Lower-case hex hardware address, without separators
    #[must_use]
    pub fn bridge_id(&self) -> String {
        hue::bridge_id(self.mac)
    }

    #[must_use]
    pub fn bridge_uuid(&self) -> Uuid {
        let mac = self
            .mac
            .bytes()
            .into_iter()
            .fold(0u128, |acc, b| (acc << 8) | u128::from(b));

        Uuid::from_u128(BRIDGE_UUID_PREFIX | mac)
    }

    /// `ip:port`, as embedded in urls and names
    #[must_use]
    pub fn host(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}
