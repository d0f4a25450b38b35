//! # Forge IR (Intermediate Representation)
//!
//! This crate provides the intermediate representation for SchemaForge
//! microservices. It contains the data structures describing a microservice's
//! models and fields, the configuration validator that checks them, the
//! auto-fix planner that repairs them, and the menu resolver that ties a
//! microservice to its navigation.
//!
//! ## Core Concepts
//!
//! - **Microservice**: The root container, holding models and enums
//! - **Model**: A data model that maps to a database table (e.g., Invoice)
//! - **FieldDefn**: A property of a model that maps to a column (e.g., number)
//! - **ValidationReport**: Every rule violation found in one validator pass
//! - **FixPlan**: The automatic remediations derived from a report
//!

// Module declarations
pub mod autofix;
pub mod field;
pub mod menu;
pub mod microservice;
pub mod model;
pub mod report;
pub mod serialization;
pub mod validator;

// Re-export commonly used types at crate root
pub use autofix::{apply_auto_fixes, plan_fixes, AutoFix, FixPlan, InMemoryStore, ModelStore};
pub use field::{FieldDefn, MAX_CLICKABLE_ORDER, MAX_INDEXED_FIELDS, RESERVED_FIELD_NAMES};
pub use menu::{Clock, MenuCache, MenuFetcher, MenuResolver, SystemClock};
pub use microservice::{EnumDefn, Menu, Microservice};
pub use model::{
    template_has_no_custom_chars, template_placeholders, DisplayStrategy, Model,
};
pub use report::ValidationReport;
pub use serialization::{load_microservice, save_microservice};
pub use validator::{validate, Validator};

// Re-export core types that are commonly used with the IR
pub use forge_core::{
    DataType, DeleteBehavior, EngineError, EngineResult, FieldId, ForeignKeyTarget, MenuId,
    MicroserviceId, ModelId,
};

/// Current schema version for microservice definition files
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        apply_auto_fixes,
        plan_fixes,
        validate,
        AutoFix,
        // Re-exported from core
        DataType,
        EngineError,
        EngineResult,
        EnumDefn,
        FieldDefn,
        FixPlan,
        ForeignKeyTarget,
        Menu,
        MenuResolver,
        // Core types
        Microservice,
        Model,
        ValidationReport,
    };
}

// ============================================================================
// Tests
// ============================================================================
