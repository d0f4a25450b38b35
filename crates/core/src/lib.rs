//! # Forge Core
//!
//! Core types and traits for Schemaforge.
//!
//! This crate provides the foundation shared by the IR and code generation
//! crates: the unified error taxonomy, the data-type system, naming and
//! format rules, and a handful of small traits.

pub mod error;
pub mod naming;
pub mod traits;
pub mod types;

pub use error::{EngineError, EngineResult, ResultExt};
pub use traits::{Identifiable, Named};
pub use types::{
    DataType, DeleteBehavior, EnumId, FieldId, ForeignKeyTarget, MenuId, MicroserviceId, ModelId,
};
