use crate::model::identity::HostIdentity;

pub const SSDP_MULTICAST_ADDRESS: &str = "239.255.255.250";
pub const SSDP_PORT: u16 = 1900;

const SEARCH_METHOD: &str = "M-SEARCH";
const SEARCH_TARGETS: &[&str] = &["ssdp:discover", "upnp:rootdevice", "device:basic:1"];

/// True when `payload` is a discovery probe the bridge should answer
#[must_use]
pub fn is_search_request(payload: &str) -> bool {
    payload.contains(SEARCH_METHOD) && SEARCH_TARGETS.iter().any(|st| payload.contains(st))
}

/// Unicast reply to a matching search request
#[must_use]
pub fn search_response(identity: &HostIdentity) -> String {
    let host = identity.host();
    let bridge_id = identity.bridge_id();

    [
        "HTTP/1.1 200 OK\r\n",
        "EXT:\r\n",
        "CACHE-CONTROL: max-age=100\r\n",
        &format!("LOCATION: http://{host}/description.xml\r\n"),
        "SERVER: FreeRTOS/6.0.5, UPnP/1.0, IpBridge/1.17.0\r\n",
        &format!("hue-bridgeid: {bridge_id}\r\n"),
        "ST: urn:schemas-upnp-org:device:basic:1\r\n",
        &format!("USN: uuid:{}::upnp:rootdevice\r\n", identity.bridge_uuid()),
        "\r\n",
    ]
    .concat()
}
