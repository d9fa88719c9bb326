use std::net::Ipv4Addr;

use camino::Utf8Path;
use config::{Config, Environment, File, FileFormat};
use mac_address::MacAddress;
use serde::{Deserialize, Serialize};

use hue::light::LightState;

use crate::error::ApiResult;
use crate::model::ssdp::SSDP_PORT;

pub const ENV_PREFIX: &str = "FAUXBRIDGE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub ipaddress: Ipv4Addr,
    #[serde(default)]
    pub mac: Option<MacAddress>,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsdpConfig {
    #[serde(default = "default_ssdp_port")]
    pub port: u16,
    #[serde(default = "default_multicast_address")]
    pub multicast_address: Ipv4Addr,
}

impl Default for SsdpConfig {
    fn default() -> Self {
        Self {
            port: default_ssdp_port(),
            multicast_address: default_multicast_address(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
    /// Seconds a connection may stay idle before it is closed
    #[serde(default = "default_rx_timeout")]
    pub rx_timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_clients: default_max_clients(),
            rx_timeout: default_rx_timeout(),
        }
    }
}

/// A light registered at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightConfig {
    pub name: String,
    #[serde(default)]
    pub uniqueid: Option<String>,
    #[serde(default)]
    pub state: Option<LightState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub ssdp: SsdpConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
}

const fn default_http_port() -> u16 {
    80
}

const fn default_ssdp_port() -> u16 {
    SSDP_PORT
}

const fn default_multicast_address() -> Ipv4Addr {
    Ipv4Addr::new(239, 255, 255, 250)
}

const fn default_max_clients() -> usize {
    10
}

const fn default_rx_timeout() -> u64 {
    3
}

pub fn parse(filename: &Utf8Path) -> ApiResult<AppConfig> {
    let settings = Config::builder()
        .add_source(File::new(filename.as_str(), FileFormat::Yaml))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Parse configuration from yaml text, without looking at the environment
pub fn parse_str(yaml: &str) -> ApiResult<AppConfig> {
    let settings = Config::builder()
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use mac_address::MacAddress;

    use hue::light::ColorMode;

    use crate::config::parse_str;

    #[test]
    fn minimal() {
        let conf = parse_str("bridge:\n  ipaddress: 10.0.0.2\n").unwrap();

        assert_eq!(conf.bridge.ipaddress, Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(conf.bridge.mac, None);
        assert_eq!(conf.bridge.http_port, 80);
        assert_eq!(conf.ssdp.port, 1900);
        assert_eq!(conf.ssdp.multicast_address, Ipv4Addr::new(239, 255, 255, 250));
        assert_eq!(conf.http.max_clients, 10);
        assert_eq!(conf.http.rx_timeout, 3);
        assert!(conf.lights.is_empty());
    }

    #[test]
    fn full() {
        let yaml = r#"
bridge:
  ipaddress: 10.0.0.2
  mac: "00:11:22:33:44:55"
  http_port: 8080
ssdp:
  port: 1901
http:
  max_clients: 4
  rx_timeout: 10
lights:
  - name: Kitchen
  - name: Desk
    uniqueid: custom-id
    state:
      on: true
      bri: 200
      hue: 0
      sat: 0
      ct: 366
      colormode: ct
"#;
        let conf = parse_str(yaml).unwrap();

        assert_eq!(
            conf.bridge.mac,
            Some(MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]))
        );
        assert_eq!(conf.bridge.http_port, 8080);
        assert_eq!(conf.ssdp.port, 1901);
        assert_eq!(conf.http.max_clients, 4);
        assert_eq!(conf.http.rx_timeout, 10);

        assert_eq!(conf.lights.len(), 2);
        assert_eq!(conf.lights[0].name, "Kitchen");
        assert!(conf.lights[0].state.is_none());

        let desk = &conf.lights[1];
        assert_eq!(desk.uniqueid.as_deref(), Some("custom-id"));
        let state = desk.state.as_ref().unwrap();
        assert!(state.on);
        assert_eq!(state.bri, 200);
        assert_eq!(state.ct, 366);
        assert_eq!(state.colormode, ColorMode::Ct);
    }

    #[test]
    fn missing_bridge_section() {
        assert!(parse_str("lights: []\n").is_err());
    }
}
