use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::clamp::Clamp;

/// Output color of a light, 8 bits per channel
#[derive(Copy, Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    #[must_use]
    pub fn from_clamped([r, g, b]: [f64; 3]) -> Self {
        Self::new(r.channel_clamped(), g.channel_clamped(), b.channel_clamped())
    }

    #[must_use]
    pub fn from_truncated([r, g, b]: [f64; 3]) -> Self {
        Self::new(
            r.channel_truncated(),
            g.channel_truncated(),
            b.channel_truncated(),
        )
    }

    #[must_use]
    pub fn largest(&self) -> u8 {
        self.red.max(self.green).max(self.blue)
    }

    #[must_use]
    pub fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Rescale the color so the largest channel becomes `bri`.
    ///
    /// This is lossy: every channel is truncated, so applying it repeatedly
    /// drifts the hue of dim colors.
    #[must_use]
    pub fn scale_to_brightness(self, bri: u8) -> Self {
        let largest = u32::from(self.largest());
        if largest == 0 {
            return Self::BLACK;
        }

        let bri = u32::from(bri);
        let [red, green, blue] = self.to_array().map(|c| {
            let scaled = u32::from(c) * bri / largest;
            u8::try_from(scaled).unwrap_or(u8::MAX)
        });

        Self { red, green, blue }
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}
