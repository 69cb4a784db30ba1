// upkeep-api: Async Rust client for the Uptime Robot v2 API

pub mod client;
pub mod error;
pub mod resource;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use resource::{Params, Resource, ServerId};
pub use transport::TransportConfig;
