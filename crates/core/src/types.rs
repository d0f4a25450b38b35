//! Core types used throughout Schemaforge
//!
//! This module contains the fundamental types shared by the IR, the
//! validator, and the code generation pipeline.

use serde::{Deserialize, Serialize};

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Type alias for microservice unique identifiers
pub type MicroserviceId = uuid::Uuid;

/// Type alias for model unique identifiers
pub type ModelId = uuid::Uuid;

/// Type alias for field unique identifiers
pub type FieldId = uuid::Uuid;

/// Type alias for enum unique identifiers
pub type EnumId = uuid::Uuid;

/// Type alias for menu unique identifiers
pub type MenuId = uuid::Uuid;

// ============================================================================
// Data Types
// ============================================================================

/// Data types supported for model fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    /// Variable-length string (VARCHAR)
    String,
    /// Long-form text content
    Text,
    /// URL-safe slug
    Slug,
    /// Email address
    Email,
    /// URL
    Url,
    /// Phone number
    Phone,
    /// IP address (v4 or v6)
    Ip,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Fixed-point decimal (money etc.)
    Decimal,
    /// Boolean true/false
    Bool,
    /// Date without time
    Date,
    /// Date and time with timezone
    DateTime,
    /// Time without date
    Time,
    /// UUID (universally unique identifier)
    Uuid,
    /// JSON/JSONB data
    Json,
    /// Array of strings
    StringArray,
    /// Array of integers
    IntArray,
    /// Enumerated value, backed by an `EnumDefn`
    Enum,
    /// File upload reference
    Upload,
}

impl DataType {
    /// Whether the type is string-like.
    ///
    /// String-like fields end up in the generated "search" category; everything
    /// else is filterable only.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            DataType::String
                | DataType::Text
                | DataType::Slug
                | DataType::Email
                | DataType::Url
                | DataType::Phone
                | DataType::Ip
        )
    }

    /// Whether the type admits `min_length`/`max_length` constraints
    pub fn supports_length(&self) -> bool {
        self.is_string_like()
    }

    /// All data types, in declaration order
    pub fn all() -> &'static [DataType] {
        &[
            DataType::String,
            DataType::Text,
            DataType::Slug,
            DataType::Email,
            DataType::Url,
            DataType::Phone,
            DataType::Ip,
            DataType::Int,
            DataType::Float,
            DataType::Decimal,
            DataType::Bool,
            DataType::Date,
            DataType::DateTime,
            DataType::Time,
            DataType::Uuid,
            DataType::Json,
            DataType::StringArray,
            DataType::IntArray,
            DataType::Enum,
            DataType::Upload,
        ]
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::String => "String",
            DataType::Text => "Text",
            DataType::Slug => "Slug",
            DataType::Email => "Email",
            DataType::Url => "Url",
            DataType::Phone => "Phone",
            DataType::Ip => "Ip",
            DataType::Int => "Int",
            DataType::Float => "Float",
            DataType::Decimal => "Decimal",
            DataType::Bool => "Bool",
            DataType::Date => "Date",
            DataType::DateTime => "DateTime",
            DataType::Time => "Time",
            DataType::Uuid => "UUID",
            DataType::Json => "Json",
            DataType::StringArray => "StringArray",
            DataType::IntArray => "IntArray",
            DataType::Enum => "Enum",
            DataType::Upload => "Upload",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Foreign Key Target
// ============================================================================

/// Whether a foreign key points inside or outside the owning microservice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForeignKeyTarget {
    /// Relation to a model within the same microservice (joinable locally)
    Internal,
    /// Relation to a model owned by a different microservice
    /// (resolved via a remote detail-resolution call)
    External,
}

impl std::fmt::Display for ForeignKeyTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForeignKeyTarget::Internal => write!(f, "Internal"),
            ForeignKeyTarget::External => write!(f, "External"),
        }
    }
}

// ============================================================================
// Delete Behavior
// ============================================================================

/// What happens to child rows when the referenced parent row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeleteBehavior {
    /// Delete child rows along with the parent
    Cascade,
    /// Refuse to delete the parent while children exist
    Restrict,
}

impl DeleteBehavior {
    /// SQL fragment for the behavior
    pub fn to_sql(&self) -> &'static str {
        match self {
            DeleteBehavior::Cascade => "CASCADE",
            DeleteBehavior::Restrict => "RESTRICT",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_like_classification() {
        assert!(DataType::String.is_string_like());
        assert!(DataType::Email.is_string_like());
        assert!(DataType::Slug.is_string_like());
        assert!(!DataType::Int.is_string_like());
        assert!(!DataType::Uuid.is_string_like());
        assert!(!DataType::Bool.is_string_like());
        assert!(!DataType::Enum.is_string_like());
    }

    #[test]
    fn test_length_support() {
        assert!(DataType::String.supports_length());
        assert!(!DataType::Uuid.supports_length());
        assert!(!DataType::Json.supports_length());
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::Uuid.to_string(), "UUID");
        assert_eq!(DataType::DateTime.to_string(), "DateTime");
    }

    #[test]
    fn test_data_type_serde_round_trip() {
        for dt in DataType::all() {
            let json = serde_json::to_string(dt).unwrap();
            let back: DataType = serde_json::from_str(&json).unwrap();
            assert_eq!(*dt, back);
        }
    }

    #[test]
    fn test_delete_behavior_sql() {
        assert_eq!(DeleteBehavior::Cascade.to_sql(), "CASCADE");
        assert_eq!(DeleteBehavior::Restrict.to_sql(), "RESTRICT");
    }

    #[test]
    fn test_foreign_key_target_display() {
        assert_eq!(ForeignKeyTarget::Internal.to_string(), "Internal");
        assert_eq!(ForeignKeyTarget::External.to_string(), "External");
    }
}
