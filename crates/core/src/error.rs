//! Error types for Schemaforge
//!
//! This module provides unified error handling across the engine: validation
//! errors, not-found and conflict errors, manifest/migration errors, and
//! internal failures.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Schemaforge
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Model-level validation failed
    #[error("Model validation failed for '{model}': {message}")]
    ModelValidation { model: String, message: String },

    /// Field-level validation failed
    #[error("Field validation failed for '{model}.{field}': {message}")]
    FieldValidation {
        model: String,
        field: String,
        message: String,
    },

    /// A caller-supplied path escaped the allow-listed output root
    #[error("Path outside allowed output root: {}", .0.display())]
    PathOutsideSandbox(PathBuf),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Microservice not found
    #[error("Microservice not found: {0}")]
    MicroserviceNotFound(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Field not found
    #[error("Field '{field}' not found in model '{model}'")]
    FieldNotFound { model: String, field: String },

    /// Template placeholder has no value
    #[error("Template placeholder not found: {0}")]
    PlaceholderNotFound(String),

    // ========================================================================
    // Conflict Errors
    // ========================================================================
    /// Duplicate model name
    #[error("Duplicate model name: '{0}' already exists")]
    DuplicateModel(String),

    /// Duplicate field name
    #[error("Duplicate field name: '{field}' already exists in model '{model}'")]
    DuplicateField { model: String, field: String },

    // ========================================================================
    // Authorization Errors
    // ========================================================================
    /// Permission denied
    #[error("Authorization error: {0}")]
    Authorization(String),

    // ========================================================================
    // Migration / Manifest Errors
    // ========================================================================
    /// Manifest file exists but cannot be parsed
    #[error("Migration manifest at '{}' is corrupt: {message}", .path.display())]
    ManifestCorrupt { path: PathBuf, message: String },

    /// Manifest declares an unsupported version
    #[error("Migration manifest version mismatch: expected {expected}, found {found}")]
    ManifestVersionMismatch { expected: u32, found: u32 },

    // ========================================================================
    // Code Generation Errors
    // ========================================================================
    /// Code generation failed
    #[error("Code generation failed: {0}")]
    CodeGeneration(String),

    /// Template rendering failed
    #[error("Template rendering failed for '{template}': {message}")]
    TemplateRender { template: String, message: String },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File write error
    #[error("Failed to write file '{}': {message}", .path.display())]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{}': {message}", .path.display())]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Invalid microservice file format
    #[error("Invalid microservice file format: {0}")]
    InvalidFileFormat(String),

    /// Schema version mismatch in a microservice file
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (unexpected failure, transaction failure, unrecoverable
    /// external-service error)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create a model validation error
    pub fn model_validation(model: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::ModelValidation {
            model: model.into(),
            message: msg.into(),
        }
    }

    /// Create a field validation error
    pub fn field_validation(
        model: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        EngineError::FieldValidation {
            model: model.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a code generation error
    pub fn codegen(msg: impl Into<String>) -> Self {
        EngineError::CodeGeneration(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    ///
    /// Sandbox violations are validation-class: they indicate a caller-supplied
    /// path outside policy, not a system fault.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::ModelValidation { .. }
                | EngineError::FieldValidation { .. }
                | EngineError::PathOutsideSandbox(_)
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::MicroserviceNotFound(_)
                | EngineError::ModelNotFound(_)
                | EngineError::FieldNotFound { .. }
                | EngineError::PlaceholderNotFound(_)
        )
    }

    /// Check if this error is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            EngineError::DuplicateModel(_) | EngineError::DuplicateField { .. }
        )
    }

    /// Check if this error is a manifest/migration error
    pub fn is_migration_issue(&self) -> bool {
        matches!(
            self,
            EngineError::ManifestCorrupt { .. } | EngineError::ManifestVersionMismatch { .. }
        )
    }

    /// Check if this error is an internal error
    pub fn is_internal(&self) -> bool {
        matches!(self, EngineError::Internal(_))
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            EngineError::Io(_) | EngineError::FileWrite { .. } | EngineError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T>;
}

impl<T, E: Into<EngineError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T> {
        self.map_err(|e| {
            let err: EngineError = e.into();
            EngineError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = EngineError::validation("Name is required");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_model_validation_error() {
        let err = EngineError::model_validation("Invoice", "Name must be singular");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Model validation failed for 'Invoice': Name must be singular"
        );
    }

    #[test]
    fn test_field_validation_error() {
        let err = EngineError::field_validation("Invoice", "number", "Must be camelCase");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Field validation failed for 'Invoice.number': Must be camelCase"
        );
    }

    #[test]
    fn test_sandbox_violation_is_validation() {
        let err = EngineError::PathOutsideSandbox(PathBuf::from("/etc/passwd"));
        assert!(err.is_validation());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_not_found_errors() {
        let err = EngineError::ModelNotFound("Invoice".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Model not found: Invoice");
    }

    #[test]
    fn test_conflict_errors() {
        let err = EngineError::DuplicateModel("Invoice".to_string());
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "Duplicate model name: 'Invoice' already exists"
        );

        let err = EngineError::DuplicateField {
            model: "Invoice".to_string(),
            field: "number".to_string(),
        };
        assert!(err.is_conflict());
    }

    #[test]
    fn test_migration_errors() {
        let err = EngineError::ManifestVersionMismatch {
            expected: 1,
            found: 2,
        };
        assert!(err.is_migration_issue());
        assert_eq!(
            err.to_string(),
            "Migration manifest version mismatch: expected 1, found 2"
        );

        let err = EngineError::ManifestCorrupt {
            path: PathBuf::from("/tmp/manifest.json"),
            message: "unexpected end of input".to_string(),
        };
        assert!(err.is_migration_issue());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_error_with_context() {
        let err = EngineError::with_context("Updating manifest", "Permission denied");
        assert_eq!(err.to_string(), "Updating manifest: Permission denied");
    }

    #[test]
    fn test_io_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EngineError = io_err.into();
        assert!(err.is_io());
    }

    #[test]
    fn test_result_ext_with_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.with_context("Writing output").unwrap_err();
        assert!(err.to_string().starts_with("Writing output:"));
    }
}
