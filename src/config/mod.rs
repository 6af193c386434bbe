//! Configuration module for the console.
//!
//! Handles the settings file, environment variable expansion, and defaults.

mod settings;

pub use settings::{
    expand_env_vars, AuthSettings, BackendSettings, DashboardSettings, Settings, SettingsError,
};
