use hue::legacy_api::{ApiLight, ApiLightList, NewUserReply, state_ack};

use crate::bridge::{Bridge, StateChange};
use crate::error::ApiResult;
use crate::routes::Response;
use crate::routes::extractor::FlatBody;

const LIGHTS: &str = "lights";

/// Light number following the `lights` component of `path`.
///
/// `None` when there is no such component. A missing or non-numeric number
/// reads as 0, too many digits saturate.
#[must_use]
pub fn light_number(path: &str) -> Option<usize> {
    let pos = path.find(LIGHTS)?;
    let rest = path[pos + LIGHTS.len()..].trim_start_matches('/');

    let number = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0usize, |acc, b| {
            acc.saturating_mul(10).saturating_add(usize::from(b - b'0'))
        });

    Some(number)
}

/// `GET /api/<user>/lights[/<n>]`
pub fn get_lights(bridge: &Bridge, path: &str) -> ApiResult<Option<Response>> {
    let Some(number) = light_number(path) else {
        return Ok(None);
    };

    let body = if number == 0 {
        log::debug!("Listing {} lights", bridge.lights.len());
        serde_json::to_string(&ApiLightList(bridge.lights.iter()))?
    } else if let Ok(light) = bridge.lights.get(number - 1) {
        log::debug!("Describing light {number} ({:?})", light.name);
        serde_json::to_string(&ApiLight::from(light))?
    } else {
        log::debug!("Light {number} requested, but not present");
        "{}".to_string()
    };

    Ok(Some(Response::json(body)))
}

/// `PUT /api` (pairing) and `PUT /api/<user>/lights/<n>/state`
pub fn put_light_state(bridge: &mut Bridge, path: &str, body: &str) -> ApiResult<Option<Response>> {
    let fields = FlatBody::parse(body);

    if fields.contains("devicetype") {
        log::debug!("Pairing request, handing out the standard username");
        let reply = serde_json::to_string(&NewUserReply::standard())?;
        return Ok(Some(Response::json(reply)));
    }

    if !path.contains("state") || body.is_empty() {
        return Ok(None);
    }

    let Some(index) = light_number(path).and_then(|n| n.checked_sub(1)) else {
        return Ok(None);
    };

    let Ok(light) = bridge.lights.get_mut(index) else {
        log::debug!("State change for light {}, but not present", index + 1);
        return Ok(None);
    };

    light.apply_update(&fields.light_state_update());

    let ack = state_ack(index + 1, light.state());
    let change = StateChange::new(index, light);

    let reply = serde_json::to_string(&ack)?;
    bridge.notify(&change);

    Ok(Some(Response::json(reply)))
}
