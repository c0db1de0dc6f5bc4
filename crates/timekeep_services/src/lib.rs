//! Timekeep Services Layer
//!
//! Configuration shared by the command-line front end.

pub mod settings;

pub use settings::{LoggingSettings, ReportFormat, ReportSettings, Settings, SettingsError};
