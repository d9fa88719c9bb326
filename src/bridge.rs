use std::fmt::{self, Debug};

use hue::light::{Light, LightId, LightState};
use hue::rgb::Rgb;

use crate::error::ApiResult;
use crate::model::identity::HostIdentity;
use crate::model::ssdp;
use crate::resource::Resources;
use crate::routes::{self, Request, Response};

/// A light after a network client changed its state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// 0-based listing position at the time of the change
    pub index: usize,
    pub id: LightId,
    pub name: String,
    pub state: LightState,
    pub color: Rgb,
}

impl StateChange {
    #[must_use]
    pub fn new(index: usize, light: &Light) -> Self {
        Self {
            index,
            id: light.id,
            name: light.name.clone(),
            state: light.state().clone(),
            color: light.color(),
        }
    }
}

/// Receives every accepted state change, synchronously, while the bridge is
/// still borrowed. Keep it short.
pub trait StateListener: Send {
    fn state_changed(&mut self, change: &StateChange);
}

impl<F> StateListener for F
where
    F: FnMut(&StateChange) + Send,
{
    fn state_changed(&mut self, change: &StateChange) {
        self(change);
    }
}

/// The emulated bridge: light registry plus protocol entry points.
///
/// Owns no sockets. The host feeds it discovery payloads and requests, and
/// sends back whatever it returns.
pub struct Bridge {
    identity: HostIdentity,
    enabled: bool,
    pub lights: Resources,
    listener: Option<Box<dyn StateListener>>,
}

impl Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("identity", &self.identity)
            .field("enabled", &self.enabled)
            .field("lights", &self.lights)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Bridge {
    #[must_use]
    pub const fn new(identity: HostIdentity) -> Self {
        Self {
            identity,
            enabled: true,
            lights: Resources::new(identity.mac),
            listener: None,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    /// Port advertised in discovery replies and the description document
    pub const fn set_port(&mut self, port: u16) {
        self.identity.port = port;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::info!("Bridge {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    pub fn set_listener(&mut self, listener: impl StateListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub(crate) fn notify(&mut self, change: &StateChange) {
        if let Some(listener) = &mut self.listener {
            listener.state_changed(change);
        }
    }

    /// Reply to a discovery payload, if it is a search this bridge answers
    #[must_use]
    pub fn handle_probe(&self, payload: &[u8]) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let payload = String::from_utf8_lossy(payload);
        if !ssdp::is_search_request(&payload) {
            return None;
        }

        log::debug!("Answering discovery probe");
        Some(ssdp::search_response(&self.identity))
    }

    /// Handle a request. `Ok(None)` means not handled, and the transport
    /// picks the fallback reply.
    pub fn handle_request(&mut self, req: &Request) -> ApiResult<Option<Response>> {
        if !self.enabled {
            return Ok(None);
        }

        routes::route(self, req)
    }

    /// Parse and handle one complete raw request
    pub fn handle_raw(&mut self, data: &[u8]) -> ApiResult<Option<Response>> {
        self.handle_request(&Request::parse(data))
    }
}
