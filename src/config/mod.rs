//! Configuration loading.
//!
//! See [`settings`] for the TOML schema and file search order.

pub mod settings;

pub use settings::{EndpointSettings, ServerSettings, Settings, SettingsError};
