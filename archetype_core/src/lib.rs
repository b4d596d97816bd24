mod archetype;
mod config;
mod registry;

pub use archetype::{Archetype, ArchetypeError};
pub use config::{ArchetypeConfig, ArchetypeFileConfig};
pub use registry::ArchetypeRegistry;

use std::path::PathBuf;
use thiserror::Error;

/// Error loading archetype configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}

/// Error looking up a loaded archetype
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),
}
