use std::fmt::Display;

use mac_address::MacAddress;

use hue::error::{HueError, HueResult};
use hue::light::{ColorMode, Light, LightId, LightState};
use hue::rgb::Rgb;

/// Selects a light: by stable id, by 0-based listing position, or by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKey<'a> {
    Id(LightId),
    Index(usize),
    Name(&'a str),
}

impl From<LightId> for LightKey<'_> {
    fn from(value: LightId) -> Self {
        Self::Id(value)
    }
}

impl From<usize> for LightKey<'_> {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl<'a> From<&'a str> for LightKey<'a> {
    fn from(value: &'a str) -> Self {
        Self::Name(value)
    }
}

impl Display for LightKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Index(index) => write!(f, "at position {index}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// In-memory registry of virtual lights.
///
/// Lights are kept in listing order. The protocol addresses them by 1-based
/// position, which shifts when an earlier light is removed; host code should
/// prefer [`LightId`], which never changes.
#[derive(Debug)]
pub struct Resources {
    mac: MacAddress,
    lights: Vec<Light>,
    next_id: u32,
}

impl Resources {
    #[must_use]
    pub const fn new(mac: MacAddress) -> Self {
        Self {
            mac,
            lights: vec![],
            next_id: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Light> {
        self.lights.iter()
    }

    pub fn add(&mut self, name: impl Into<String>) -> LightId {
        let id = LightId(self.next_id);
        self.next_id += 1;

        let uniqueid = hue::light_unique_id(self.mac, id.0);
        let light = Light::new(id, name, &uniqueid);
        log::info!("Light {:?} added as {id}", light.name);

        self.lights.push(light);
        id
    }

    /// Current 0-based listing position of a light
    pub fn index_of<'a>(&self, key: impl Into<LightKey<'a>>) -> Option<usize> {
        match key.into() {
            LightKey::Id(id) => self.lights.iter().position(|light| light.id == id),
            LightKey::Index(index) => (index < self.lights.len()).then_some(index),
            LightKey::Name(name) => self.lights.iter().position(|light| light.name == name),
        }
    }

    pub fn id_of<'a>(&self, key: impl Into<LightKey<'a>>) -> Option<LightId> {
        self.index_of(key).map(|index| self.lights[index].id)
    }

    pub fn get<'a>(&self, key: impl Into<LightKey<'a>>) -> HueResult<&Light> {
        let key = key.into();
        self.index_of(key)
            .map(|index| &self.lights[index])
            .ok_or_else(|| HueError::LightNotFound(key.to_string()))
    }

    pub fn get_mut<'a>(&mut self, key: impl Into<LightKey<'a>>) -> HueResult<&mut Light> {
        let key = key.into();
        match self.index_of(key) {
            Some(index) => Ok(&mut self.lights[index]),
            None => Err(HueError::LightNotFound(key.to_string())),
        }
    }

    pub fn rename<'a>(&mut self, key: impl Into<LightKey<'a>>, name: &str) -> HueResult<()> {
        let light = self.get_mut(key)?;
        log::info!("Light {} renamed from {:?} to {name:?}", light.id, light.name);
        light.name = name.to_string();
        Ok(())
    }

    /// Remove a light. Lights listed after it move up one position.
    pub fn remove<'a>(&mut self, key: impl Into<LightKey<'a>>) -> HueResult<Light> {
        let key = key.into();
        let index = self
            .index_of(key)
            .ok_or_else(|| HueError::LightNotFound(key.to_string()))?;

        let light = self.lights.remove(index);
        log::info!("Light {} ({:?}) removed", light.id, light.name);
        Ok(light)
    }

    pub fn name<'a>(&self, key: impl Into<LightKey<'a>>) -> HueResult<&str> {
        Ok(&self.get(key)?.name)
    }

    pub fn state<'a>(&self, key: impl Into<LightKey<'a>>) -> HueResult<&LightState> {
        Ok(self.get(key)?.state())
    }

    pub fn color<'a>(&self, key: impl Into<LightKey<'a>>) -> HueResult<Rgb> {
        Ok(self.get(key)?.color())
    }

    pub fn colormode<'a>(&self, key: impl Into<LightKey<'a>>) -> HueResult<ColorMode> {
        Ok(self.get(key)?.colormode())
    }

    pub fn set_uniqueid<'a>(&mut self, key: impl Into<LightKey<'a>>, uniqueid: &str) -> HueResult<()> {
        self.get_mut(key)?.set_uniqueid(uniqueid);
        Ok(())
    }

    pub fn set_state<'a>(&mut self, key: impl Into<LightKey<'a>>, state: LightState) -> HueResult<()> {
        self.get_mut(key)?.set_state(state);
        Ok(())
    }

    pub fn set_state_bri<'a>(&mut self, key: impl Into<LightKey<'a>>, on: bool, bri: u8) -> HueResult<()> {
        self.get_mut(key)?.set_brightness(on, bri);
        Ok(())
    }

    pub fn set_state_hue_sat<'a>(
        &mut self,
        key: impl Into<LightKey<'a>>,
        hue: u16,
        sat: u8,
    ) -> HueResult<()> {
        self.get_mut(key)?.set_hue_sat(hue, sat);
        Ok(())
    }

    pub fn set_state_color_temp<'a>(&mut self, key: impl Into<LightKey<'a>>, ct: u16) -> HueResult<()> {
        self.get_mut(key)?.set_color_temp(ct);
        Ok(())
    }
}
