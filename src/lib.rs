pub mod bridge;
pub mod config;
pub mod error;
pub mod model;
pub mod resource;
pub mod routes;
pub mod server;
