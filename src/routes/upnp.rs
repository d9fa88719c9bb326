use crate::bridge::Bridge;
use crate::error::ApiResult;
use crate::model::upnp;
use crate::routes::Response;

pub fn description_xml(bridge: &Bridge) -> ApiResult<Response> {
    log::debug!("Serving description document");

    let root = upnp::bridge_description(bridge.identity());

    Ok(Response::xml(upnp::to_xml(&root)?))
}
