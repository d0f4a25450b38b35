//! Model definitions
//!
//! A `Model` is one entity type owned by a microservice: a named collection
//! of `FieldDefn`s plus a display-value strategy that picks the
//! human-readable label for its records.

use crate::FieldDefn;
use forge_core::{FieldId, ModelId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Model
// ============================================================================

/// An entity type within a microservice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for this model
    pub id: ModelId,

    /// Model name (singular, Start Case), unique within the microservice
    pub name: String,

    /// Human-readable label
    pub label: String,

    /// URL slug (kebab-case)
    pub slug: Option<String>,

    /// Single-field display strategy: the designated field
    pub display_value_id: Option<FieldId>,

    /// Template display strategy, e.g. `"{bankAccount} - {date}"`
    pub display_value_template: Option<String>,

    /// Field driving the dashboard stage grouping, if any
    pub dashboard_stage_field: Option<FieldId>,

    /// The model's fields
    pub field_defns: Vec<FieldDefn>,
}

impl Model {
    /// Create a new model with a primary-key field
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let label = name.clone();
        Self {
            id: Uuid::new_v4(),
            name,
            label,
            slug: None,
            display_value_id: None,
            display_value_template: None,
            dashboard_stage_field: None,
            field_defns: vec![FieldDefn::primary_key()],
        }
    }

    /// Create a model without any fields (used by validator tests)
    pub fn empty(name: impl Into<String>) -> Self {
        let mut model = Self::new(name);
        model.field_defns.clear();
        model
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Add a field
    pub fn with_field(mut self, field: FieldDefn) -> Self {
        self.field_defns.push(field);
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the slug
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Use a single field as the display value
    pub fn with_display_field(mut self, field_id: FieldId) -> Self {
        self.display_value_id = Some(field_id);
        self.display_value_template = None;
        self
    }

    /// Use a placeholder template as the display value
    pub fn with_display_template(mut self, template: impl Into<String>) -> Self {
        self.display_value_template = Some(template.into());
        self.display_value_id = None;
        self
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Find a field by id
    pub fn field_by_id(&self, id: FieldId) -> Option<&FieldDefn> {
        self.field_defns.iter().find(|f| f.id == id)
    }

    /// Find a field by name
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDefn> {
        self.field_defns.iter().find(|f| f.name == name)
    }

    /// The configured display strategy
    pub fn display_strategy(&self) -> DisplayStrategy<'_> {
        if let Some(id) = self.display_value_id {
            DisplayStrategy::Field(id)
        } else if let Some(template) = self.display_value_template.as_deref() {
            DisplayStrategy::Template(template)
        } else {
            DisplayStrategy::None
        }
    }

    /// The single field used as display value, when that strategy applies
    pub fn display_field(&self) -> Option<&FieldDefn> {
        self.display_value_id.and_then(|id| self.field_by_id(id))
    }

    /// Fields marked as indexed
    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldDefn> {
        self.field_defns.iter().filter(|f| f.is_index)
    }

    /// Fields marked as the clickable link
    pub fn clickable_fields(&self) -> Vec<&FieldDefn> {
        self.field_defns
            .iter()
            .filter(|f| f.is_clickable_link)
            .collect()
    }
}

impl forge_core::Identifiable for Model {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl forge_core::Named for Model {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

// ============================================================================
// DisplayStrategy
// ============================================================================

/// How a model's records get their human-readable label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStrategy<'a> {
    /// One designated field
    Field(FieldId),
    /// A placeholder template over several fields
    Template(&'a str),
    /// No display value configured
    None,
}

// ============================================================================
// Template placeholder extraction
// ============================================================================

/// Extract the root placeholder names from a display template.
///
/// `"{bankAccount} - {date}"` yields `["bankAccount", "date"]`. Unterminated
/// braces are ignored rather than reported; the validator flags unresolvable
/// names separately.
pub fn template_placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty() {
                    names.push(name);
                }
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

/// Whether a template consists solely of `{field}` tokens and whitespace.
///
/// Templates with no literal characters get a relaxed required-ness rule
/// during display-value validation.
pub fn template_has_no_custom_chars(template: &str) -> bool {
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        if !rest[..start].chars().all(char::is_whitespace) {
            return false;
        }
        match rest[start + 1..].find('}') {
            Some(end) => rest = &rest[start + 1 + end + 1..],
            None => return false,
        }
    }
    rest.chars().all(char::is_whitespace)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::DataType;

    #[test]
    fn test_model_new() {
        let model = Model::new("Invoice");
        assert_eq!(model.name, "Invoice");
        assert_eq!(model.label, "Invoice");
        assert_eq!(model.field_defns.len(), 1);
        assert!(model.field_defns[0].is_primary_key());
    }

    #[test]
    fn test_field_lookups() {
        let number = FieldDefn::new("number", DataType::String);
        let number_id = number.id;
        let model = Model::new("Invoice").with_field(number);

        assert!(model.field_by_name("number").is_some());
        assert!(model.field_by_name("missing").is_none());
        assert_eq!(model.field_by_id(number_id).unwrap().name, "number");
    }

    #[test]
    fn test_display_strategy() {
        let number = FieldDefn::new("number", DataType::String);
        let number_id = number.id;

        let model = Model::new("Invoice").with_field(number);
        assert_eq!(model.display_strategy(), DisplayStrategy::None);

        let model = model.with_display_field(number_id);
        assert_eq!(model.display_strategy(), DisplayStrategy::Field(number_id));
        assert_eq!(model.display_field().unwrap().name, "number");

        let model = model.with_display_template("{number}");
        assert_eq!(model.display_strategy(), DisplayStrategy::Template("{number}"));
        // Switching strategies clears the other one
        assert!(model.display_value_id.is_none());
    }

    #[test]
    fn test_template_placeholders() {
        assert_eq!(
            template_placeholders("{bankAccount} - {date}"),
            vec!["bankAccount", "date"]
        );
        assert_eq!(template_placeholders("{number}"), vec!["number"]);
        assert_eq!(template_placeholders("no tokens"), Vec::<&str>::new());
        // Unterminated brace: the valid prefix still parses
        assert_eq!(template_placeholders("{a} {b"), vec!["a"]);
        // Empty token ignored
        assert_eq!(template_placeholders("{} {a}"), vec!["a"]);
    }

    #[test]
    fn test_template_has_no_custom_chars() {
        assert!(template_has_no_custom_chars("{number}"));
        assert!(template_has_no_custom_chars("{a} {b}"));
        assert!(template_has_no_custom_chars("  {a}  {b} "));

        assert!(!template_has_no_custom_chars("{a} - {b}"));
        assert!(!template_has_no_custom_chars("Invoice {a}"));
        assert!(!template_has_no_custom_chars("{a"));
    }

    #[test]
    fn test_clickable_fields() {
        let model = Model::new("Invoice")
            .with_field(FieldDefn::new("number", DataType::String).clickable(0))
            .with_field(FieldDefn::new("note", DataType::Text));
        assert_eq!(model.clickable_fields().len(), 1);
    }
}
