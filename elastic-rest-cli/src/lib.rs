//! # Elastic REST CLI
//!
//! Command-line front end for the elastic-rest client.
//!
//! This crate provides the argument definitions, configuration wiring and
//! command implementations behind the `elastic-rest` binary.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands, ConnectionArgs, LogFormat};
pub use config::Dependencies;

use elastic_rest_client::ElasticError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Client error.
    #[error("Client error: {0}")]
    ClientError(#[from] ElasticError),

    /// Invalid JSON input.
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The requested document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
