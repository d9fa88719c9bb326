/// Conversion of a computed color channel (nominally 0.0..=255.0) to `u8`
pub trait Clamp {
    /// Clamp to `0..=255`, then truncate towards zero
    fn channel_clamped(self) -> u8;

    /// Truncate towards zero, without clamping first.
    ///
    /// Out-of-range values saturate at the `u8` bounds, because that is what
    /// a float-to-int `as` cast does.
    fn channel_truncated(self) -> u8;

    fn channel_from_u8(value: u8) -> Self;
}

impl Clamp for f64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn channel_clamped(self) -> u8 {
        self.clamp(0.0, 255.0) as u8
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn channel_truncated(self) -> u8 {
        self as u8
    }

    fn channel_from_u8(value: u8) -> Self {
        Self::from(value)
    }
}
