//! Fantasy League Service Library
//!
//! Configuration, logging, data loading and the batch jobs behind the
//! `fantasy-league` command-line tool.

use anyhow::{Context, Result};
use std::path::Path;

pub mod cli;
pub mod config;
pub mod data;
pub mod jobs;
pub mod logging;

pub use config::ServiceConfig;
pub use data::Dataset;
pub use logging::initialize_logging;

/// Load configuration from an optional file and environment variables
pub fn load_configuration(path: Option<&Path>) -> Result<ServiceConfig> {
    config::load_config(path).context("Failed to load service configuration")
}
