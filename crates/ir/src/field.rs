//! Field definitions for model properties
//!
//! This module contains the `FieldDefn` struct describing a single attribute
//! of a model: its data type, optionality, foreign-key shape, display flags,
//! and constraints.

use forge_core::{
    DataType, DeleteBehavior, EnumId, FieldId, ForeignKeyTarget, MicroserviceId, ModelId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Field names the engine reserves for generated columns.
///
/// `id` is special: it is the primary key and the only field allowed to end
/// in the letters "Id"/"id".
pub const RESERVED_FIELD_NAMES: &[&str] = &[
    "id",
    "createdAt",
    "updatedAt",
    "deletedAt",
    "createdBy",
    "updatedBy",
];

/// Maximum number of indexed fields per model
pub const MAX_INDEXED_FIELDS: usize = 30;

/// Highest `order` value allowed for the clickable-link field
pub const MAX_CLICKABLE_ORDER: i32 = 2;

// ============================================================================
// FieldDefn
// ============================================================================

/// A single field (attribute) of a model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefn {
    /// Unique identifier for this field
    pub id: FieldId,

    /// Field name (camelCase)
    pub name: String,

    /// Data type of the field
    pub data_type: DataType,

    /// Whether the field may be null/absent
    pub is_optional: bool,

    /// Whether this field is a foreign key
    pub is_foreign_key: bool,

    /// Internal vs external foreign key (if `is_foreign_key`)
    pub foreign_key_target: Option<ForeignKeyTarget>,

    /// Referenced model within the same microservice (internal FK)
    pub foreign_key_model_id: Option<ModelId>,

    /// Referenced model in another microservice (external FK)
    pub external_model_id: Option<ModelId>,

    /// Owning microservice of the external model (external FK)
    pub external_microservice_id: Option<MicroserviceId>,

    /// Whether this field renders as the row's clickable link
    pub is_clickable_link: bool,

    /// Display order (lower numbers appear first)
    pub order: i32,

    /// Whether to create a database index on this field
    pub is_index: bool,

    /// Whether the field shows in table views
    pub show_in_table: bool,

    /// Whether the field shows in the detail card
    pub show_in_detail_card: bool,

    /// Whether the field must be unique
    pub is_unique: bool,

    /// Delete behavior this FK imposes on its parent (Cascade/Restrict)
    pub on_delete: Option<DeleteBehavior>,

    /// Backing enum definition (required when `data_type` is `Enum`)
    pub enum_defn_id: Option<EnumId>,

    /// Minimum length constraint (string-like types only)
    pub min_length: Option<u32>,

    /// Maximum length constraint (string-like types only)
    pub max_length: Option<u32>,

    /// Human-readable description
    pub description: Option<String>,
}

impl FieldDefn {
    /// Create a new field with the given name and data type
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            data_type,
            is_optional: false,
            is_foreign_key: false,
            foreign_key_target: None,
            foreign_key_model_id: None,
            external_model_id: None,
            external_microservice_id: None,
            is_clickable_link: false,
            order: 0,
            is_index: false,
            show_in_table: true,
            show_in_detail_card: true,
            is_unique: false,
            on_delete: None,
            enum_defn_id: None,
            min_length: None,
            max_length: None,
            description: None,
        }
    }

    /// Create the reserved UUID primary-key field
    pub fn primary_key() -> Self {
        let mut field = Self::new("id", DataType::Uuid);
        field.is_index = true;
        field.is_unique = true;
        field.show_in_table = false;
        field
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field optional
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Mark the field unique
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self.is_index = true;
        self
    }

    /// Mark the field indexed
    pub fn indexed(mut self) -> Self {
        self.is_index = true;
        self
    }

    /// Make this field an internal foreign key to a model in the same
    /// microservice
    pub fn internal_fk(mut self, model_id: ModelId) -> Self {
        self.is_foreign_key = true;
        self.foreign_key_target = Some(ForeignKeyTarget::Internal);
        self.foreign_key_model_id = Some(model_id);
        self.is_index = true;
        self
    }

    /// Make this field an external foreign key to a model in another
    /// microservice
    pub fn external_fk(mut self, model_id: ModelId, microservice_id: MicroserviceId) -> Self {
        self.is_foreign_key = true;
        self.foreign_key_target = Some(ForeignKeyTarget::External);
        self.external_model_id = Some(model_id);
        self.external_microservice_id = Some(microservice_id);
        self
    }

    /// Mark this field as the clickable link with a display order
    pub fn clickable(mut self, order: i32) -> Self {
        self.is_clickable_link = true;
        self.order = order;
        self
    }

    /// Set the delete behavior for this foreign key
    pub fn on_delete(mut self, behavior: DeleteBehavior) -> Self {
        self.on_delete = Some(behavior);
        self
    }

    /// Set the backing enum definition
    pub fn with_enum(mut self, enum_id: EnumId) -> Self {
        self.data_type = DataType::Enum;
        self.enum_defn_id = Some(enum_id);
        self
    }

    /// Set length constraints
    pub fn with_length(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Set the display order
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Hide the field from table views
    pub fn hidden_in_table(mut self) -> Self {
        self.show_in_table = false;
        self
    }

    /// Hide the field from the detail card
    pub fn hidden_in_detail(mut self) -> Self {
        self.show_in_detail_card = false;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // ========================================================================
    // Classification helpers
    // ========================================================================

    /// Whether this is an internal foreign key
    pub fn is_internal_fk(&self) -> bool {
        self.is_foreign_key && self.foreign_key_target == Some(ForeignKeyTarget::Internal)
    }

    /// Whether this is an external foreign key
    pub fn is_external_fk(&self) -> bool {
        self.is_foreign_key && self.foreign_key_target == Some(ForeignKeyTarget::External)
    }

    /// Whether this is the reserved primary-key field
    pub fn is_primary_key(&self) -> bool {
        self.name == "id"
    }

    /// Whether the description marks this field as an external reference.
    ///
    /// Bare UUID fields (no FK flag) are only legal for `id` or when the
    /// author documents them as references resolved elsewhere.
    pub fn described_as_external_ref(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| d.to_ascii_lowercase().contains("external reference"))
    }

    /// Whether the field is visible in both the table and the detail card
    pub fn fully_visible(&self) -> bool {
        self.show_in_table && self.show_in_detail_card
    }
}

impl forge_core::Identifiable for FieldDefn {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl forge_core::Named for FieldDefn {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl PartialEq for FieldDefn {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FieldDefn {}

// ============================================================================
// Tests
// ============================================================================
