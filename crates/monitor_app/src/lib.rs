//! Uptime monitor application: wires the pure core to the engine.
mod controller;
mod effects;
pub mod render;
mod settings;

pub use controller::{Controller, ControllerEvent};
pub use settings::{load_settings, MonitorSettings, SettingsError, SETTINGS_FILENAME};
