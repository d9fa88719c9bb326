use std::sync::Arc;

use mac_address::MacAddress;
use tokio::sync::Mutex;

use crate::bridge::Bridge;
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::model::identity::HostIdentity;

#[derive(Clone)]
pub struct AppState {
    conf: Arc<AppConfig>,
    pub bridge: Arc<Mutex<Bridge>>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> ApiResult<Self> {
        let mac = Self::host_mac(&config)?;
        let identity = HostIdentity::new(config.bridge.ipaddress, config.bridge.http_port, mac);

        log::info!("Emulating bridge {} at {}", identity.bridge_id(), identity.host());

        let mut bridge = Bridge::new(identity);

        for light in &config.lights {
            let id = bridge.lights.add(light.name.as_str());

            if let Some(uniqueid) = &light.uniqueid {
                bridge.lights.set_uniqueid(id, uniqueid)?;
            }

            if let Some(state) = &light.state {
                bridge.lights.set_state(id, state.clone())?;
            }
        }

        if bridge.lights.is_empty() {
            log::warn!("No lights configured, clients will not find anything to control");
        }

        let conf = Arc::new(config);
        let bridge = Arc::new(Mutex::new(bridge));

        Ok(Self { conf, bridge })
    }

    fn host_mac(config: &AppConfig) -> ApiResult<MacAddress> {
        if let Some(mac) = config.bridge.mac {
            return Ok(mac);
        }

        let mac = mac_address::get_mac_address()?.ok_or(ApiError::MissingMacAddress)?;
        log::info!("No mac address configured, using detected address [{mac}]");
        Ok(mac)
    }

    #[must_use]
    pub fn config(&self) -> Arc<AppConfig> {
        self.conf.clone()
    }
}

#[cfg(test)]
mod tests {
    use hue::light::ColorMode;

    use crate::config::parse_str;
    use crate::server::appstate::AppState;

    #[tokio::test]
    async fn lights_from_config() {
        let yaml = r#"
bridge:
  ipaddress: 10.0.0.2
  mac: "00:11:22:33:44:55"
lights:
  - name: Kitchen
  - name: Desk
    uniqueid: custom-id
    state:
      on: true
      bri: 200
      hue: 0
      sat: 0
      ct: 250
      colormode: ct
"#;
        let state = AppState::from_config(parse_str(yaml).unwrap()).unwrap();
        let bridge = state.bridge.lock().await;

        assert_eq!(bridge.identity().host(), "10.0.0.2:80");
        assert_eq!(bridge.identity().bridge_id(), "001122334455");

        assert_eq!(bridge.lights.len(), 2);
        assert_eq!(
            bridge.lights.get("Kitchen").unwrap().uniqueid(),
            "00:11:22:33:44:55:00:00-00"
        );

        let desk = bridge.lights.get("Desk").unwrap();
        assert_eq!(desk.uniqueid(), "custom-id");
        assert_eq!(desk.colormode(), ColorMode::Ct);
        assert_eq!(desk.color(), hue::colortemp::ct_to_rgb(250));
        drop(bridge);
    }
}
