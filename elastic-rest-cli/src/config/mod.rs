//! Configuration and dependency wiring for the CLI.

mod dependencies;

pub use dependencies::{client_config, Dependencies};
