use serde::Serialize;
use uuid::Uuid;

use crate::model::identity::HostIdentity;

const XML_DOCTYPE: &str = r#"<?xml version="1.0" ?>"#;

const XMLNS: &str = "urn:schemas-upnp-org:device-1-0";
const SCHEMA_DEVICE_BASIC: &str = "urn:schemas-upnp-org:device:Basic:1";

#[derive(Debug, Clone, Serialize)]
#[serde(rename = "root")]
pub struct Root {
    #[serde(rename = "@xmlns")]
    xmlns: String,

    #[serde(rename = "specVersion")]
    pub spec_version: SpecVersion,

    /// Kept as text: a parsed url would drop the explicit `:80`
    #[serde(rename = "URLBase")]
    pub url_base: String,

    pub device: Device,
}

impl Root {
    #[must_use]
    pub fn new(url_base: impl Into<String>, device: Device) -> Self {
        Self {
            xmlns: XMLNS.to_string(),
            spec_version: SpecVersion::VERSION_1,
            url_base: url_base.into(),
            device,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpecVersion {
    pub major: u32,
    pub minor: u32,
}

impl SpecVersion {
    pub const VERSION_1: Self = Self { major: 1, minor: 0 };
}

mod prefixed_uuid {
    use serde::Serializer;
    use uuid::Uuid;

    pub fn serialize<S>(value: &Uuid, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("uuid:{value}"))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_type: String,

    pub friendly_name: String,

    pub manufacturer: String,

    #[serde(rename = "manufacturerURL", skip_serializing_if = "Option::is_none")]
    pub manufacturer_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_description: Option<String>,

    pub model_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,

    #[serde(rename = "modelURL", skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(rename = "UDN", with = "prefixed_uuid")]
    pub udn: Uuid,

    #[serde(rename = "presentationURL", skip_serializing_if = "Option::is_none")]
    pub presentation_url: Option<String>,
}

impl Device {
    pub fn new(
        friendly_name: impl AsRef<str>,
        manufacturer: impl AsRef<str>,
        model_name: impl AsRef<str>,
        udn: Uuid,
    ) -> Self {
        Self {
            device_type: SCHEMA_DEVICE_BASIC.to_string(),
            friendly_name: friendly_name.as_ref().into(),
            manufacturer: manufacturer.as_ref().into(),
            model_name: model_name.as_ref().into(),
            manufacturer_url: None,
            model_description: None,
            model_number: None,
            model_url: None,
            serial_number: None,
            udn,
            presentation_url: None,
        }
    }

    #[must_use]
    pub fn with_manufacturer_url(self, value: impl Into<String>) -> Self {
        Self {
            manufacturer_url: Some(value.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_model_description(self, value: impl Into<String>) -> Self {
        Self {
            model_description: Some(value.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_model_number(self, value: impl Into<String>) -> Self {
        Self {
            model_number: Some(value.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_model_url(self, value: impl Into<String>) -> Self {
        Self {
            model_url: Some(value.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_serial_number(self, value: impl Into<String>) -> Self {
        Self {
            serial_number: Some(value.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_presentation_url(self, value: impl Into<String>) -> Self {
        Self {
            presentation_url: Some(value.into()),
            ..self
        }
    }
}

/// Description document of a first-generation Hue bridge at `identity`
#[must_use]
pub fn bridge_description(identity: &HostIdentity) -> Root {
    let host = identity.host();
    let bridge_id = identity.bridge_id();

    let device = Device::new(
        format!("Philips hue ({host})"),
        "Royal Philips Electronics",
        hue::HUE_BRIDGE_V1_MODEL_NAME,
        identity.bridge_uuid(),
    )
    .with_manufacturer_url("http://www.philips.com")
    .with_model_description("Philips hue Personal Wireless Lighting")
    .with_model_number(hue::HUE_BRIDGE_V1_MODEL_NUMBER)
    .with_model_url("http://www.meethue.com")
    .with_serial_number(bridge_id)
    .with_presentation_url("index.html");

    Root::new(format!("http://{host}/"), device)
}

/// Serialize without indentation, directly after the xml declaration
pub fn to_xml(value: impl Serialize) -> Result<String, quick_xml::se::SeError> {
    let mut res = XML_DOCTYPE.to_string();

    let ser = quick_xml::se::Serializer::new(&mut res);
    value.serialize(ser)?;

    Ok(res)
}
