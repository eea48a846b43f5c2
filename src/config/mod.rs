//! Configuration module for the budget wizard
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::WizardPaths;
pub use settings::{LicenseReductionPolicy, Settings};
