pub mod clamp;
pub mod colortemp;
pub mod error;
pub mod hs;
pub mod legacy_api;
pub mod light;
pub mod rgb;

#[cfg(feature = "mac")]
use mac_address::MacAddress;

pub const LIGHT_MODEL_ID: &str = "LCT015";
pub const LIGHT_MANUFACTURER: &str = "Philips";
pub const LIGHT_PRODUCT_NAME: &str = "E4";
pub const LIGHT_SWVERSION: &str = "5.105.0.21169";

pub const HUE_BRIDGE_V1_MODEL_NAME: &str = "Philips hue bridge 2012";
pub const HUE_BRIDGE_V1_MODEL_NUMBER: &str = "929000226503";

/// Bridge identifier: the hardware address as lower-case hex, without separators
#[cfg(feature = "mac")]
#[must_use]
pub fn bridge_id(mac: MacAddress) -> String {
    hex::encode(mac.bytes())
}

/// Unique id for the light with sequence number `seq`, e.g. `AA:BB:CC:DD:EE:FF:00:00-01`
///
/// The low 24 bits of `seq` fill the last three bytes, so the id always fits
/// in [`light::UNIQUE_ID_MAX_LEN`] characters. Sequence numbers wrap at 2^24.
#[cfg(feature = "mac")]
#[must_use]
pub fn light_unique_id(mac: MacAddress, seq: u32) -> String {
    let [_, hi, mid, lo] = seq.to_be_bytes();
    format!("{mac}:{hi:02X}:{mid:02X}-{lo:02X}")
}


#[cfg(all(test, feature = "mac"))]
mod mac_tests {
    use mac_address::MacAddress;

    use crate::{bridge_id, light_unique_id};

    fn mac() -> MacAddress {
        MacAddress::new([0xAA, 0xBB, 0xCC, 0x0D, 0xEE, 0xFF])
    }

    #[test]
    fn bridge_id_is_lowercase_without_colons() {
        assert_eq!(bridge_id(mac()), "aabbcc0deeff");
    }

    #[test]
    fn light_unique_id_format() {
        assert_eq!(light_unique_id(mac(), 0), "AA:BB:CC:0D:EE:FF:00:00-00");
        assert_eq!(light_unique_id(mac(), 26), "AA:BB:CC:0D:EE:FF:00:00-1A");
        assert_eq!(light_unique_id(mac(), 0).len(), crate::light::UNIQUE_ID_MAX_LEN);
    }

    #[test]
    fn light_unique_id_past_one_byte() {
        assert_eq!(light_unique_id(mac(), 0x10), "AA:BB:CC:0D:EE:FF:00:00-10");
        assert_eq!(light_unique_id(mac(), 0x100), "AA:BB:CC:0D:EE:FF:00:01-00");
        assert_eq!(light_unique_id(mac(), 0x0012_3456), "AA:BB:CC:0D:EE:FF:12:34-56");
        assert_eq!(light_unique_id(mac(), 0x0100_0000), light_unique_id(mac(), 0));

        for seq in [0xFF, 0x100, 0xFFFF, 0x0001_0000, 0x00FF_FFFF] {
            assert_eq!(light_unique_id(mac(), seq).len(), crate::light::UNIQUE_ID_MAX_LEN);
        }
    }
}
