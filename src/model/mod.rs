pub mod identity;
pub mod ssdp;
pub mod upnp;
