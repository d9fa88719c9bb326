use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::colortemp::ct_to_rgb;
use crate::hs::{RawHS, hsb_to_rgb};
use crate::rgb::Rgb;

pub const UNIQUE_ID_MAX_LEN: usize = 26;

pub const DEFAULT_CT: u16 = 153;
pub const MAX_BRIGHTNESS: u8 = 254;

/// Stable identity of a light. Never reused, unaffected by removals.
#[derive(Copy, Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct LightId(pub u32);

impl Display for LightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Hs,
    Ct,
    Xy,
}

impl ColorMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hs => "hs",
            Self::Ct => "ct",
            Self::Xy => "xy",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LightState {
    pub on: bool,
    pub bri: u8,
    pub hue: u16,
    pub sat: u8,
    pub ct: u16,
    pub colormode: ColorMode,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            on: false,
            bri: 0,
            hue: 0,
            sat: 0,
            ct: DEFAULT_CT,
            colormode: ColorMode::Hs,
        }
    }
}

impl LightState {
    #[must_use]
    pub const fn hs(&self) -> RawHS {
        RawHS {
            hue: self.hue,
            sat: self.sat,
        }
    }
}

/// Fields of a v1 `PUT /api/<user>/lights/<n>/state` request
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LightStateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Light {
    pub id: LightId,
    pub name: String,
    uniqueid: String,
    state: LightState,
    color: Rgb,
}

impl Light {
    #[must_use]
    pub fn new(id: LightId, name: impl Into<String>, uniqueid: &str) -> Self {
        let mut res = Self {
            id,
            name: name.into(),
            uniqueid: String::new(),
            state: LightState::default(),
            color: Rgb::BLACK,
        };
        res.set_uniqueid(uniqueid);
        res
    }

    #[must_use]
    pub fn uniqueid(&self) -> &str {
        &self.uniqueid
    }

    /// Replace the unique id, truncated to [`UNIQUE_ID_MAX_LEN`] characters
    pub fn set_uniqueid(&mut self, uniqueid: &str) {
        self.uniqueid = uniqueid.chars().take(UNIQUE_ID_MAX_LEN).collect();
    }

    #[must_use]
    pub const fn state(&self) -> &LightState {
        &self.state
    }

    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    #[must_use]
    pub const fn colormode(&self) -> ColorMode {
        self.state.colormode
    }

    /// Overwrite the whole state, then derive the color from the color mode.
    ///
    /// For [`ColorMode::Xy`] the color is left as it was.
    pub fn set_state(&mut self, state: LightState) {
        self.state = state;
        match self.state.colormode {
            ColorMode::Ct => self.recompute_ct(),
            ColorMode::Hs => self.recompute_hs(),
            ColorMode::Xy => {}
        }
    }

    /// Set power and brightness, rescaling the current color
    pub fn set_brightness(&mut self, on: bool, bri: u8) {
        self.state.on = on;
        self.state.bri = bri;
        self.rescale();
    }

    pub fn set_hue_sat(&mut self, hue: u16, sat: u8) {
        self.state.hue = hue;
        self.state.sat = sat;
        self.state.colormode = ColorMode::Hs;
        self.recompute_hs();
    }

    pub fn set_color_temp(&mut self, ct: u16) {
        self.state.ct = ct;
        self.state.colormode = ColorMode::Ct;
        self.recompute_ct();
    }

    /// Apply a v1 state update, field by field.
    ///
    /// Power: `bri` wins (and implies `on = bri > 0`), then an explicit
    /// `"on": false`; anything else switches the light on, restoring full
    /// brightness when it was at zero.
    ///
    /// Color: `hue` only records the value and the mode. The color is
    /// recomputed by `sat` and `ct`, not by `hue` alone.
    pub fn apply_update(&mut self, upd: &LightStateUpdate) {
        if let Some(bri) = upd.bri {
            self.state.bri = bri;
            self.state.on = bri > 0;
            self.rescale();
        } else if upd.on == Some(false) {
            self.state.on = false;
        } else {
            self.state.on = true;
            if self.state.bri == 0 {
                self.state.bri = MAX_BRIGHTNESS;
                self.recompute_hs();
            }
        }

        if let Some(hue) = upd.hue {
            self.state.hue = hue;
            self.state.colormode = ColorMode::Hs;
        }

        if let Some(sat) = upd.sat {
            self.state.sat = sat;
            self.state.colormode = ColorMode::Hs;
            self.recompute_hs();
        }

        if let Some(ct) = upd.ct {
            self.state.ct = ct;
            self.state.colormode = ColorMode::Ct;
            self.recompute_ct();
        }
    }

    fn recompute_hs(&mut self) {
        self.color = hsb_to_rgb(self.state.hs(), self.state.bri);
    }

    fn recompute_ct(&mut self) {
        self.color = ct_to_rgb(self.state.ct);
    }

    fn rescale(&mut self) {
        self.color = self.color.scale_to_brightness(self.state.bri);
    }
}

#[cfg(test)]
mod tests {
    use crate::colortemp::ct_to_rgb;
    use crate::hs::{RawHS, hsb_to_rgb};
    use crate::light::{ColorMode, Light, LightId, LightState, LightStateUpdate};
    use crate::rgb::Rgb;

    fn light() -> Light {
        Light::new(LightId(0), "Desk", "00:11:22:33:44:55:00:00-00")
    }

    fn red_light() -> Light {
        let mut light = light();
        light.set_state(LightState {
            on: true,
            bri: 254,
            hue: 0,
            sat: 255,
            ..LightState::default()
        });
        light
    }

    #[test]
    fn new_light_is_off_and_black() {
        let light = light();
        assert_eq!(light.state(), &LightState::default());
        assert!(!light.state().on);
        assert_eq!(light.color(), Rgb::BLACK);
    }

    #[test]
    fn uniqueid_truncated() {
        let mut light = light();
        light.set_uniqueid("0123456789abcdefghijklmnopqrstuvwxyz");
        assert_eq!(light.uniqueid(), "0123456789abcdefghijklmnop");
    }

    #[test]
    fn set_state_ct() {
        let mut light = light();
        light.set_state(LightState {
            ct: 366,
            colormode: ColorMode::Ct,
            ..LightState::default()
        });
        assert_eq!(light.color(), ct_to_rgb(366));
    }

    #[test]
    fn set_state_hs() {
        let mut light = light();
        let state = LightState {
            on: true,
            bri: 180,
            hue: 12000,
            sat: 200,
            ..LightState::default()
        };
        light.set_state(state.clone());
        assert_eq!(light.color(), hsb_to_rgb(state.hs(), 180));
    }

    #[test]
    fn set_state_xy_keeps_stale_color() {
        let mut light = red_light();
        light.set_state(LightState {
            ct: 500,
            colormode: ColorMode::Xy,
            ..LightState::default()
        });
        assert_eq!(light.colormode(), ColorMode::Xy);
        assert_eq!(light.color(), Rgb::new(253, 0, 0));
    }

    #[test]
    fn set_brightness_rescales() {
        let mut light = red_light();
        light.set_brightness(true, 100);
        assert_eq!(light.color(), Rgb::new(100, 0, 0));
        assert_eq!(light.state().bri, 100);
    }

    #[test]
    fn set_hue_sat_is_idempotent() {
        let mut light = red_light();
        light.set_hue_sat(30000, 150);
        let first = light.color();
        for _ in 0..5 {
            light.set_hue_sat(30000, 150);
        }
        assert_eq!(light.color(), first);
        assert_eq!(first, hsb_to_rgb(RawHS { hue: 30000, sat: 150 }, 254));
    }

    #[test]
    fn set_color_temp_forces_ct() {
        let mut light = red_light();
        light.set_color_temp(250);
        assert_eq!(light.colormode(), ColorMode::Ct);
        assert_eq!(light.color(), ct_to_rgb(250));
    }

    #[test]
    fn update_bri() {
        let mut light = red_light();
        light.apply_update(&LightStateUpdate {
            bri: Some(100),
            ..Default::default()
        });
        assert!(light.state().on);
        assert_eq!(light.state().bri, 100);
        assert_eq!(light.color(), Rgb::new(100, 0, 0));
    }

    #[test]
    fn update_bri_zero_turns_off() {
        let mut light = red_light();
        light.apply_update(&LightStateUpdate {
            bri: Some(0),
            ..Default::default()
        });
        assert!(!light.state().on);
        assert_eq!(light.color(), Rgb::BLACK);
    }

    #[test]
    fn update_off_keeps_brightness() {
        let mut light = red_light();
        light.apply_update(&LightStateUpdate {
            on: Some(false),
            ..Default::default()
        });
        assert!(!light.state().on);
        assert_eq!(light.state().bri, 254);
        assert_eq!(light.color(), Rgb::new(253, 0, 0));
    }

    #[test]
    fn update_on_restores_brightness() {
        let mut light = light();
        light.set_state(LightState {
            hue: 0,
            sat: 255,
            ..LightState::default()
        });
        assert_eq!(light.color(), Rgb::BLACK);

        light.apply_update(&LightStateUpdate {
            on: Some(true),
            ..Default::default()
        });
        assert!(light.state().on);
        assert_eq!(light.state().bri, 254);
        assert_eq!(light.color(), Rgb::new(253, 0, 0));
    }

    #[test]
    fn update_without_power_fields_turns_on() {
        let mut light = red_light();
        light.set_brightness(false, 254);
        light.apply_update(&LightStateUpdate {
            ct: Some(153),
            ..Default::default()
        });
        assert!(light.state().on);
        assert_eq!(light.colormode(), ColorMode::Ct);
        assert_eq!(light.color(), ct_to_rgb(153));
    }

    #[test]
    fn update_hue_alone_does_not_recompute() {
        let mut light = red_light();
        light.set_color_temp(366);

        light.apply_update(&LightStateUpdate {
            hue: Some(21845),
            ..Default::default()
        });

        assert_eq!(light.state().hue, 21845);
        assert_eq!(light.colormode(), ColorMode::Hs);
        // still the color temperature color
        assert_eq!(light.color(), ct_to_rgb(366));
    }

    #[test]
    fn update_hue_and_sat_recomputes() {
        let mut light = red_light();
        light.apply_update(&LightStateUpdate {
            hue: Some(21845),
            sat: Some(255),
            ..Default::default()
        });
        assert_eq!(light.colormode(), ColorMode::Hs);
        assert_eq!(light.color(), Rgb::new(0, 253, 0));
    }
}
