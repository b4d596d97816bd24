use crate::archetype::Archetype;
use crate::config::ArchetypeFileConfig;
use crate::{ConfigError, LookupError};
use std::collections::HashMap;
use std::path::Path;

/// Registry of all archetypes, loaded from TOML files
#[derive(Debug, Default)]
pub struct ArchetypeRegistry {
    archetypes: HashMap<String, Archetype>,
}

impl ArchetypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all archetypes from a directory (recursively)
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Load archetypes from a directory recursively
    fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            let path = entry.path();

            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                self.load_file(&path)?;
            }
        }

        Ok(())
    }

    /// Load a single archetype file
    fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        let config: ArchetypeFileConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            error: e,
            path: path.to_path_buf(),
        })?;

        let archetype = Archetype::from_config(config).map_err(|e| ConfigError::Validation {
            message: e.to_string(),
            path: path.to_path_buf(),
        })?;

        if self.archetypes.contains_key(&archetype.id) {
            return Err(ConfigError::Validation {
                message: format!("Duplicate archetype id '{}'", archetype.id),
                path: path.to_path_buf(),
            });
        }

        self.archetypes.insert(archetype.id.clone(), archetype);
        Ok(())
    }

    /// Add or replace an archetype built in code
    pub fn insert(&mut self, archetype: Archetype) -> Option<Archetype> {
        self.archetypes.insert(archetype.id.clone(), archetype)
    }

    /// Get an archetype by ID
    pub fn get(&self, id: &str) -> Option<&Archetype> {
        self.archetypes.get(id)
    }

    /// Get an archetype by ID, failing if it was never loaded
    pub fn require(&self, id: &str) -> Result<&Archetype, LookupError> {
        self.get(id)
            .ok_or_else(|| LookupError::UnknownArchetype(id.to_string()))
    }

    /// Check if an archetype exists
    pub fn contains(&self, id: &str) -> bool {
        self.archetypes.contains_key(id)
    }

    /// List all archetype IDs
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.archetypes.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}
