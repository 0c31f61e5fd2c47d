//! Homewire Core — configuration and shared error types.

pub mod config;
pub mod error;

pub use config::{DataPaths, HomewireConfig, UpstreamConfig};
pub use error::{Error, Result};
