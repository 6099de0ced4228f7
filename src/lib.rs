//! Meshcast - message-driven weather assistant
//!
//! This library provides the core functionality for resolving free-text
//! location queries (coordinates, military grid references, place names)
//! and answering them with formatted weather, forecast, and air-quality
//! reports, with a satellite-image attachment for continental-US
//! locations.

pub mod api;
pub mod bot;
pub mod classifier;
pub mod config;
pub mod error;
pub mod imagery;
pub mod interpret;
pub mod location_resolver;
pub mod messaging;
pub mod mgrs;
pub mod models;
pub mod report;

// Re-export core types for public API
pub use api::WeatherApiClient;
pub use bot::{Command, WeatherBot, parse_command};
pub use classifier::{LocationQuery, classify};
pub use config::MeshcastConfig;
pub use error::MeshcastError;
pub use location_resolver::resolve_location;
pub use messaging::{Attachment, ConsoleMessenger, InboundMessage, Messenger};
pub use models::ResolvedLocation;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, MeshcastError>;
