use serde_json::{Map, Value};

use hue::light::{LightStateUpdate, MAX_BRIGHTNESS};

/// Top-level fields of a request body.
///
/// Clients of the v1 api are sloppy about headers and content, so the body is
/// never rejected: anything that is not a json object is treated as empty.
#[derive(Debug, Clone, Default)]
pub struct FlatBody(Map<String, Value>);

impl FlatBody {
    #[must_use]
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(Value::Object(map)) => Self(map),
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn bool(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(Value::as_bool)
    }

    /// Non-negative number, fraction truncated, saturated at `u64::MAX`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn number(&self, field: &str) -> Option<u64> {
        let value = self.0.get(field)?;
        if let Some(n) = value.as_u64() {
            return Some(n);
        }
        match value.as_f64() {
            // float to int casts saturate
            Some(n) if n >= 0.0 => Some(n as u64),
            _ => None,
        }
    }

    fn saturated<T: TryFrom<u64> + Bounded>(&self, field: &str) -> Option<T> {
        self.number(field).map(|n| T::try_from(n).unwrap_or(T::MAX))
    }

    #[must_use]
    pub fn light_state_update(&self) -> LightStateUpdate {
        LightStateUpdate {
            on: self.bool("on"),
            bri: self
                .saturated::<u8>("bri")
                .map(|bri| bri.min(MAX_BRIGHTNESS)),
            hue: self.saturated("hue"),
            sat: self.saturated("sat"),
            ct: self.saturated("ct"),
        }
    }
}

trait Bounded {
    const MAX: Self;
}

impl Bounded for u8 {
    const MAX: Self = Self::MAX;
}

impl Bounded for u16 {
    const MAX: Self = Self::MAX;
}
