//! # Forge Codegen
//!
//! Code generation engine for SchemaForge.
//!
//! This crate turns a validated microservice graph into backend source
//! artifacts by flat placeholder substitution over caller-supplied
//! templates.
//!
//! ## Features
//!
//! - **Relation Resolution**: nested include clauses from display-value chains
//! - **Template Assembly**: typed placeholder maps rendered into templates
//! - **Fixture Values**: deterministic sample data for generated tests
//! - **Generation**: sequential per-model artifact production
//! - **Migration Manifest**: checksummed record of what was generated
//!

// ============================================================================
// Modules
// ============================================================================

pub mod fixtures;
pub mod generator;
pub mod manifest;
pub mod placeholders;
pub mod relations;

// ============================================================================
// Re-exports
// ============================================================================

pub use generator::{generate, summarize, ArtifactTemplate, GenerationSummary, Generator, TemplateSet};
pub use manifest::{
    model_checksum, schema_checksum, ManifestTracker, MigrationManifest, MANIFEST_FILE_NAME,
    MANIFEST_VERSION,
};
pub use placeholders::{render, PlaceholderKey, PlaceholderMap};
pub use relations::{resolve_relations, IncludeClause, NestedField, RelationPlan};

use forge_core::{EngineError, EngineResult};
use std::path::{Path, PathBuf};

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the code generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Output directory for generated code
    pub output_dir: PathBuf,

    /// Whether to generate test scaffolds
    pub generate_tests: bool,

    /// Whether to overwrite existing files on disk
    pub overwrite: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./generated"),
            generate_tests: true,
            overwrite: false,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Disable test scaffold generation
    pub fn without_tests(mut self) -> Self {
        self.generate_tests = false;
        self
    }

    /// Allow overwriting existing files
    pub fn allow_overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }
}

// ============================================================================
// GeneratedFile
// ============================================================================

/// Kind of generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Data-access controller for one model
    Controller,
    /// Request schema for one model
    Schema,
    /// Route wiring for one model
    Routes,
    /// Test scaffold for one model
    Test,
    /// App-wide route registration
    AppRoutes,
    Other,
}

impl FileType {
    /// Short label used in logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            FileType::Controller => "controller",
            FileType::Schema => "schema",
            FileType::Routes => "routes",
            FileType::Test => "test",
            FileType::AppRoutes => "app-routes",
            FileType::Other => "other",
        }
    }
}

/// Represents a single generated file
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Relative path from the output directory
    pub path: PathBuf,

    /// File content
    pub content: String,

    /// Artifact kind for categorization
    pub file_type: FileType,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, file_type: FileType) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            file_type,
        }
    }
}

// ============================================================================
// GeneratedBundle
// ============================================================================

/// Collection of all generated files for one microservice
#[derive(Debug, Clone, Default)]
pub struct GeneratedBundle {
    /// Microservice name
    pub name: String,

    /// All generated files
    pub files: Vec<GeneratedFile>,

    /// Warnings raised during generation
    pub warnings: Vec<String>,
}

impl GeneratedBundle {
    /// Create a new bundle
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a file to the bundle
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Get the number of files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get files by type
    pub fn files_by_type(&self, file_type: FileType) -> Vec<&GeneratedFile> {
        self.files
            .iter()
            .filter(|f| f.file_type == file_type)
            .collect()
    }

    /// Write all files to disk under `base_dir`.
    ///
    /// Existing files are an error unless `overwrite` is set.
    pub fn write_to_disk(&self, base_dir: impl AsRef<Path>, overwrite: bool) -> EngineResult<()> {
        let base_dir = base_dir.as_ref();

        for file in &self.files {
            let full_path = base_dir.join(&file.path);

            if !overwrite && full_path.exists() {
                return Err(EngineError::FileWrite {
                    path: full_path,
                    message: "file already exists (pass overwrite to replace)".to_string(),
                });
            }

            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }

            std::fs::write(&full_path, &file.content).map_err(|e| EngineError::FileWrite {
                path: full_path.clone(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
