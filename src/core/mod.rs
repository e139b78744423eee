//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - CLI parsing and validation
//! - User configuration file and resolved settings
//! - Error types
//! - Process-wide initialization
//! - Subcommand runners

pub mod cli;
pub mod config_file;
pub mod errors;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod toolkit;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config_file::ConfigFile;
pub use errors::{AnimatorError, MediaError, OutlineError, SourceError};
pub use runner::run_app;
pub use settings::Settings;
