//! # Kerfline Core
//!
//! Core types shared by the Kerfline crates: the error taxonomy and the
//! engine configuration.

pub mod config;
pub mod error;

pub use config::EngineConfig;
pub use error::{ConfigError, DesignerError, Error, Result};
