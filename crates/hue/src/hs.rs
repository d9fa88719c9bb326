use serde::{Deserialize, Serialize};

use crate::clamp::Clamp;
use crate::rgb::Rgb;

/// Hue and saturation, both normalized to `0.0..1.0`
#[derive(Copy, Debug, Serialize, Deserialize, Clone)]
pub struct HS {
    pub hue: f64,
    pub sat: f64,
}

/// Hue and saturation as seen on the wire (`hue` 0..=65535, `sat` 0..=255)
#[derive(Copy, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct RawHS {
    pub hue: u16,
    pub sat: u8,
}

impl From<RawHS> for HS {
    fn from(raw: RawHS) -> Self {
        Self {
            hue: f64::from(raw.hue) / 65536.0,
            sat: f64::from(raw.sat) / f64::from(0xFF),
        }
    }
}

impl HS {
    /// Six-sector HSV conversion at full value, channels in `0.0..=255.0`
    #[allow(clippy::many_single_char_names)]
    #[must_use]
    pub fn to_rgb_full(self) -> [f64; 3] {
        let Self { hue: h, sat: s } = self;

        let sector = (h * 6.0).floor();
        let f = h.mul_add(6.0, -sector);
        let p = 255.0 * (1.0 - s);
        let q = 255.0 * f.mul_add(-s, 1.0);
        let t = 255.0 * (1.0 - f).mul_add(-s, 1.0);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        match sector as u8 % 6 {
            0 => [255.0, t, p],
            1 => [q, 255.0, p],
            2 => [p, 255.0, t],
            3 => [p, q, 255.0],
            4 => [t, p, 255.0],
            _ => [255.0, p, q],
        }
    }
}

/// Convert hue/saturation/brightness to an output color.
///
/// The full-value color is truncated to 8 bits per channel, then scaled by
/// `bri / 256` and truncated again. There is no explicit clamp on this path.
#[must_use]
pub fn hsb_to_rgb(hs: RawHS, bri: u8) -> Rgb {
    let full = Rgb::from_truncated(HS::from(hs).to_rgb_full());
    let scale = f64::from(bri) / 256.0;

    Rgb::from_truncated(full.to_array().map(|c| f64::channel_from_u8(c) * scale))
}
