//! Serialization for microservice definition files
//!
//! Microservice graphs are stored as versioned JSON. The wrapper carries a
//! schema version so newer engines can migrate older files in place; a file
//! from a newer schema than this build understands is refused rather than
//! loaded lossily.

use crate::{Microservice, SCHEMA_VERSION};
use forge_core::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// File Wrapper
// ============================================================================

/// Versioned wrapper around a stored microservice graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroserviceFile {
    /// Schema version for migration purposes
    pub schema_version: u32,

    /// The microservice data
    pub microservice: Microservice,
}

impl MicroserviceFile {
    /// Wrap a microservice graph at the current schema version
    pub fn new(microservice: Microservice) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            microservice,
        }
    }

    /// Check if migration is needed
    pub fn needs_migration(&self) -> bool {
        self.schema_version < SCHEMA_VERSION
    }

    /// Migrate to the latest schema version
    pub fn migrate(&mut self) -> EngineResult<()> {
        while self.schema_version < SCHEMA_VERSION {
            self.migrate_one_version()?;
        }
        Ok(())
    }

    fn migrate_one_version(&mut self) -> EngineResult<()> {
        match self.schema_version {
            // Per-version migration steps land here as the schema evolves
            _ => {
                self.schema_version = SCHEMA_VERSION;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a microservice definition to a file
pub fn save_microservice(microservice: &Microservice, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();
    let json = save_microservice_to_string(microservice)?;

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, json).map_err(|e| EngineError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

/// Save a microservice definition to a JSON string
pub fn save_microservice_to_string(microservice: &Microservice) -> EngineResult<String> {
    let file = MicroserviceFile::new(microservice.clone());
    Ok(serde_json::to_string_pretty(&file)?)
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a microservice definition from a file
pub fn load_microservice(path: impl AsRef<Path>) -> EngineResult<Microservice> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::MicroserviceNotFound(
            path.display().to_string(),
        ));
    }

    let json = std::fs::read_to_string(path)?;
    load_microservice_from_string(&json).map_err(|e| match e {
        EngineError::JsonSerialization(je) => {
            EngineError::InvalidFileFormat(format!("{}: {}", path.display(), je))
        }
        other => other,
    })
}

/// Load a microservice definition from a JSON string
pub fn load_microservice_from_string(json: &str) -> EngineResult<Microservice> {
    let mut file: MicroserviceFile = serde_json::from_str(json)?;

    if file.schema_version > SCHEMA_VERSION {
        return Err(EngineError::SchemaVersionMismatch {
            expected: SCHEMA_VERSION,
            found: file.schema_version,
        });
    }
    if file.needs_migration() {
        file.migrate()?;
    }
    Ok(file.microservice)
}

// ============================================================================
// Tests
// ============================================================================
