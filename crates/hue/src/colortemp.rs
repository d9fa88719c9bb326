use crate::rgb::Rgb;

/// Convert a mired value to kelvin / 100, the unit the approximation below uses
#[must_use]
pub fn mired_to_centikelvin(ct: u16) -> f64 {
    10000.0 / f64::from(ct)
}

/// Convert a color temperature (in mireds) to an output color
///
/// Piecewise logarithmic/power-law fit of blackbody radiation color, popularized
/// by Tanner Helland:
///
///   <https://tannerhelland.com/2012/09/18/convert-temperature-rgb-algorithm-code.html>
///
/// Every channel is clamped to `0..=255`. A `ct` of zero means an infinite
/// temperature, which lands on the cold (blue) end of the curve.
#[must_use]
pub fn ct_to_rgb(ct: u16) -> Rgb {
    let temp = mired_to_centikelvin(ct);

    let rgb = if temp <= 66.0 {
        let green = 99.470_802f64.mul_add(temp.ln(), -161.119_568);
        let blue = if temp <= 19.0 {
            0.0
        } else {
            138.517_731f64.mul_add((temp - 10.0).ln(), -305.044_793)
        };
        [255.0, green, blue]
    } else {
        let red = 329.698_727 * (temp - 60.0).powf(-0.133_204_76);
        let green = 288.122_17 * (temp - 60.0).powf(-0.075_514_85);
        [red, green, 255.0]
    };

    Rgb::from_clamped(rgb)
}
