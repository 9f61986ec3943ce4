//! Configuration loading and persistence.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
