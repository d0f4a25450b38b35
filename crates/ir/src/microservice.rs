//! Microservice container
//!
//! A `Microservice` owns a collection of models and enum definitions and is
//! the unit over which validation and code generation operate. `Menu` records
//! come from the external navigation service and bind microservices to the
//! models exposed in the UI shell.

use crate::Model;
use forge_core::{EnumId, MenuId, MicroserviceId, ModelId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Microservice
// ============================================================================

/// A microservice: the root of one model graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Microservice {
    /// Unique identifier
    pub id: MicroserviceId,

    /// Domain-label name (lowercase kebab, e.g. "billing-service")
    pub name: String,

    /// Human-readable label
    pub label: String,

    /// URL slug
    pub slug: Option<String>,

    /// Models owned by this microservice
    pub models: Vec<Model>,

    /// Enum definitions owned by this microservice
    pub enums: Vec<EnumDefn>,
}

impl Microservice {
    /// Create a new microservice
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            label: label.into(),
            slug: None,
            models: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Add a model
    pub fn with_model(mut self, model: Model) -> Self {
        self.models.push(model);
        self
    }

    /// Add an enum definition
    pub fn with_enum(mut self, enum_defn: EnumDefn) -> Self {
        self.enums.push(enum_defn);
        self
    }

    /// Find a model by id
    pub fn model_by_id(&self, id: ModelId) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Find a model by name
    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Find a mutable model by id
    pub fn model_by_id_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        self.models.iter_mut().find(|m| m.id == id)
    }

    /// Find an enum definition by id
    pub fn enum_by_id(&self, id: EnumId) -> Option<&EnumDefn> {
        self.enums.iter().find(|e| e.id == id)
    }

    /// Number of models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

impl forge_core::Identifiable for Microservice {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl forge_core::Named for Microservice {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

// ============================================================================
// EnumDefn
// ============================================================================

/// An enumerated type backing `DataType::Enum` fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDefn {
    /// Unique identifier
    pub id: EnumId,

    /// Enum name (Start Case)
    pub name: String,

    /// Ordered values; the first value is the generated-fixture default
    pub values: Vec<String>,
}

impl EnumDefn {
    /// Create a new enum definition
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            values,
        }
    }

    /// The first value, used as the deterministic sample in fixtures
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

// ============================================================================
// Menu
// ============================================================================

/// A navigation menu bound to a microservice, fetched from the external
/// identity/navigation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Unique identifier
    pub id: MenuId,

    /// Menu display name
    pub name: String,

    /// Model this menu opens, if any
    pub model_id: Option<ModelId>,
}

impl Menu {
    /// Create a new menu record
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            model_id: None,
        }
    }

    /// Bind the menu to a model
    pub fn for_model(mut self, model_id: ModelId) -> Self {
        self.model_id = Some(model_id);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldDefn;
    use forge_core::DataType;

    #[test]
    fn test_microservice_new() {
        let ms = Microservice::new("billing", "Billing");
        assert_eq!(ms.name, "billing");
        assert_eq!(ms.label, "Billing");
        assert_eq!(ms.model_count(), 0);
    }

    #[test]
    fn test_model_lookups() {
        let invoice = Model::new("Invoice");
        let invoice_id = invoice.id;
        let ms = Microservice::new("billing", "Billing").with_model(invoice);

        assert!(ms.model_by_name("Invoice").is_some());
        assert!(ms.model_by_name("Receipt").is_none());
        assert_eq!(ms.model_by_id(invoice_id).unwrap().name, "Invoice");
    }

    #[test]
    fn test_model_by_id_mut() {
        let invoice = Model::new("Invoice");
        let invoice_id = invoice.id;
        let mut ms = Microservice::new("billing", "Billing").with_model(invoice);

        ms.model_by_id_mut(invoice_id).unwrap().label = "Customer Invoice".to_string();
        assert_eq!(ms.model_by_id(invoice_id).unwrap().label, "Customer Invoice");
    }

    #[test]
    fn test_enum_defn() {
        let status = EnumDefn::new(
            "Status",
            vec!["Draft".to_string(), "Sent".to_string(), "Paid".to_string()],
        );
        assert_eq!(status.first_value(), Some("Draft"));

        let empty = EnumDefn::new("Empty", vec![]);
        assert_eq!(empty.first_value(), None);
    }

    #[test]
    fn test_enum_lookup() {
        let status = EnumDefn::new("Status", vec!["Open".to_string()]);
        let status_id = status.id;
        let ms = Microservice::new("billing", "Billing").with_enum(status);
        assert_eq!(ms.enum_by_id(status_id).unwrap().name, "Status");
    }

    #[test]
    fn test_menu() {
        let invoice = Model::new("Invoice").with_field(FieldDefn::new("number", DataType::String));
        let menu = Menu::new("Invoices").for_model(invoice.id);
        assert_eq!(menu.model_id, Some(invoice.id));
    }
}
