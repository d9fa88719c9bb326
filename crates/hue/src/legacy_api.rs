use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::light::{Light, LightState};
use crate::{LIGHT_MANUFACTURER, LIGHT_MODEL_ID, LIGHT_PRODUCT_NAME, LIGHT_SWVERSION};

pub const LIGHT_TYPE: &str = "Extended color light";

/// Username handed out to every pairing client
pub const STANDARD_USERNAME: &str = "2WLEDHardQrI3WHYTHoMcXHgEspsM8ZZRpSKtBQr";

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum HueApiResult<T> {
    Success(T),
}

#[derive(Debug, Serialize, Clone)]
pub struct NewUserReply {
    pub username: String,
}

impl NewUserReply {
    #[must_use]
    pub fn standard() -> Vec<HueApiResult<Self>> {
        vec![HueApiResult::Success(Self {
            username: STANDARD_USERNAME.to_string(),
        })]
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ApiLightState<'a> {
    pub on: bool,
    pub bri: u8,
    pub xy: [u8; 2],
    pub colormode: &'a str,
    pub hue: u16,
    pub sat: u8,
    pub effect: &'a str,
    pub ct: u16,
    pub mode: &'a str,
    pub reachable: bool,
}

impl<'a> From<&'a LightState> for ApiLightState<'a> {
    fn from(state: &'a LightState) -> Self {
        Self {
            on: state.on,
            bri: state.bri,
            xy: [0, 0],
            colormode: state.colormode.as_str(),
            hue: state.hue,
            sat: state.sat,
            effect: "none",
            ct: state.ct,
            mode: "homeautomation",
            reachable: true,
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct ApiStreaming {
    pub renderer: bool,
    pub proxy: bool,
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct ApiCapabilities {
    pub certified: bool,
    pub streaming: ApiStreaming,
}

impl Default for ApiCapabilities {
    fn default() -> Self {
        Self {
            certified: false,
            streaming: ApiStreaming {
                renderer: true,
                proxy: false,
            },
        }
    }
}

/// Full light descriptor, as returned by `GET /api/<user>/lights/<n>`
#[derive(Debug, Serialize, Clone)]
pub struct ApiLight<'a> {
    #[serde(rename = "type")]
    pub light_type: &'a str,
    pub name: &'a str,
    pub uniqueid: &'a str,
    pub modelid: &'a str,
    pub manufacturername: &'a str,
    pub productname: &'a str,
    pub state: ApiLightState<'a>,
    pub capabilities: ApiCapabilities,
    pub swversion: &'a str,
}

impl<'a> From<&'a Light> for ApiLight<'a> {
    fn from(light: &'a Light) -> Self {
        Self {
            light_type: LIGHT_TYPE,
            name: &light.name,
            uniqueid: light.uniqueid(),
            modelid: LIGHT_MODEL_ID,
            manufacturername: LIGHT_MANUFACTURER,
            productname: LIGHT_PRODUCT_NAME,
            state: ApiLightState::from(light.state()),
            capabilities: ApiCapabilities::default(),
            swversion: LIGHT_SWVERSION,
        }
    }
}

/// Short light descriptor, used when listing every light
#[derive(Debug, Serialize, Clone)]
pub struct ApiLightShort<'a> {
    #[serde(rename = "type")]
    pub light_type: &'a str,
    pub name: &'a str,
    pub uniqueid: &'a str,
}

impl<'a> From<&'a Light> for ApiLightShort<'a> {
    fn from(light: &'a Light) -> Self {
        Self {
            light_type: LIGHT_TYPE,
            name: &light.name,
            uniqueid: light.uniqueid(),
        }
    }
}

/// Every light in listing order, keyed by 1-based position (`"1"`, `"2"`, ..)
pub struct ApiLightList<I>(pub I);

impl<'a, I> Serialize for ApiLightList<I>
where
    I: IntoIterator<Item = &'a Light> + Clone,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (index, light) in self.0.clone().into_iter().enumerate() {
            map.serialize_entry(&(index + 1).to_string(), &ApiLightShort::from(light))?;
        }
        map.end()
    }
}

pub type StateAck = Vec<HueApiResult<BTreeMap<String, Value>>>;

/// Acknowledge a state change, reporting the current value of every field
#[must_use]
pub fn state_ack(number: usize, state: &LightState) -> StateAck {
    let fields = [
        ("on", Value::from(state.on)),
        ("bri", Value::from(state.bri)),
        ("hue", Value::from(state.hue)),
        ("sat", Value::from(state.sat)),
        ("ct", Value::from(state.ct)),
    ];

    fields
        .into_iter()
        .map(|(field, value)| {
            let path = format!("/lights/{number}/state/{field}");
            HueApiResult::Success(BTreeMap::from([(path, value)]))
        })
        .collect()
}
