//! Validation report
//!
//! A fixed enumeration of issue categories, each holding a strongly-typed
//! list. `has_errors` is derived from the category contents rather than
//! threaded through the checks as a mutable flag.

use forge_core::{FieldId, ModelId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Issue records
// ============================================================================

/// Microservice-name issue with a suggested replacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameIssue {
    pub name: String,
    pub issue: String,
    pub suggestion: String,
}

/// Generic model-level issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelIssue {
    pub id: ModelId,
    pub name: String,
    pub issue: String,
}

/// Model-name format issue with the specific sub-violations flagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelNameIssue {
    pub id: ModelId,
    pub name: String,
    pub issue: String,
    pub not_start_case: bool,
    pub not_singular: bool,
    pub suggestion: String,
}

/// Generic field-level issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldIssue {
    pub id: FieldId,
    pub model_id: ModelId,
    pub model_name: String,
    pub name: String,
    pub issue: String,
}

/// Field-name format issue with the specific sub-violations flagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNameIssue {
    pub id: FieldId,
    pub model_id: ModelId,
    pub model_name: String,
    pub name: String,
    pub issue: String,
    pub not_camel_case: bool,
    pub has_trailing_id: bool,
    pub is_reserved: bool,
    pub suggestion: String,
}

/// Display-value issue listing the optional fields that break the template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayValueIssue {
    pub id: ModelId,
    pub name: String,
    pub issue: String,
    /// Template-referenced fields that are optional but must be required
    pub optional_fields: Vec<String>,
    /// Template placeholders that resolve to no field at all
    pub unresolved_fields: Vec<String>,
}

/// Model-level issue carrying a count (clickable links, index ceiling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountIssue {
    pub id: ModelId,
    pub name: String,
    pub issue: String,
    pub count: usize,
}

/// Clickable-link order issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickableOrderIssue {
    pub id: FieldId,
    pub model_id: ModelId,
    pub model_name: String,
    pub name: String,
    pub issue: String,
    pub order: i32,
}

/// External foreign key with missing required properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalFkIssue {
    pub id: FieldId,
    pub model_id: ModelId,
    pub model_name: String,
    pub name: String,
    pub issue: String,
    /// Which of `externalModelId`/`externalMicroserviceId` are absent (or,
    /// for a stray internal reference, which property must be cleared)
    pub missing_fields: Vec<String>,
}

// ============================================================================
// ValidationReport
// ============================================================================

/// The structured multi-category output of one validator run.
///
/// Every category starts empty; checks append to their own list. Categories
/// with no entries are skipped when rendering and serializing, so an empty
/// report prints nothing and `has_errors()` is false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    // ── Microservice-level ───────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_microservice_name: Option<NameIssue>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub missing_microservice_label: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub missing_menus: bool,

    // ── Model-level ──────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub duplicate_model_names: Vec<ModelIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub missing_model_labels: Vec<ModelIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub missing_model_fields: Vec<ModelIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalid_model_names: Vec<ModelNameIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalid_model_slugs: Vec<ModelIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub duplicate_field_names: Vec<FieldIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub missing_display_values: Vec<DisplayValueIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub missing_visible_fields: Vec<ModelIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub missing_clickable_links: Vec<ModelIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub multiple_clickable_links: Vec<CountIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalid_clickable_link_orders: Vec<ClickableOrderIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalid_index_counts: Vec<CountIssue>,

    // ── Field-level ──────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalid_field_names: Vec<FieldNameIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unflagged_uuid_fields: Vec<FieldIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalid_uuid_lengths: Vec<FieldIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub missing_enum_refs: Vec<FieldIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalid_internal_foreign_keys: Vec<FieldIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalid_external_foreign_keys: Vec<ExternalFkIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub non_optional_self_references: Vec<FieldIssue>,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any category holds at least one issue
    pub fn has_errors(&self) -> bool {
        self.issue_count() > 0
    }

    /// Total number of issues across all categories
    pub fn issue_count(&self) -> usize {
        usize::from(self.invalid_microservice_name.is_some())
            + usize::from(self.missing_microservice_label)
            + usize::from(self.missing_menus)
            + self.duplicate_model_names.len()
            + self.missing_model_labels.len()
            + self.missing_model_fields.len()
            + self.invalid_model_names.len()
            + self.invalid_model_slugs.len()
            + self.duplicate_field_names.len()
            + self.missing_display_values.len()
            + self.missing_visible_fields.len()
            + self.missing_clickable_links.len()
            + self.multiple_clickable_links.len()
            + self.invalid_clickable_link_orders.len()
            + self.invalid_index_counts.len()
            + self.invalid_field_names.len()
            + self.unflagged_uuid_fields.len()
            + self.invalid_uuid_lengths.len()
            + self.missing_enum_refs.len()
            + self.invalid_internal_foreign_keys.len()
            + self.invalid_external_foreign_keys.len()
            + self.non_optional_self_references.len()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn section<T>(
            f: &mut std::fmt::Formatter<'_>,
            title: &str,
            items: &[T],
            line: impl Fn(&T) -> String,
        ) -> std::fmt::Result {
            if items.is_empty() {
                return Ok(());
            }
            writeln!(f, "{} ({}):", title, items.len())?;
            for item in items {
                writeln!(f, "  - {}", line(item))?;
            }
            Ok(())
        }

        if let Some(issue) = &self.invalid_microservice_name {
            writeln!(
                f,
                "invalidMicroserviceName: '{}' — {} (suggestion: '{}')",
                issue.name, issue.issue, issue.suggestion
            )?;
        }
        if self.missing_microservice_label {
            writeln!(f, "missingMicroserviceLabel: label must not be empty")?;
        }
        if self.missing_menus {
            writeln!(f, "missingMenus: no navigation menus bound to this microservice")?;
        }

        section(f, "duplicateModelNames", &self.duplicate_model_names, |i| {
            format!("{}: {}", i.name, i.issue)
        })?;
        section(f, "missingModelLabels", &self.missing_model_labels, |i| {
            format!("{}: {}", i.name, i.issue)
        })?;
        section(f, "missingModelFields", &self.missing_model_fields, |i| {
            format!("{}: {}", i.name, i.issue)
        })?;
        section(f, "invalidModelNames", &self.invalid_model_names, |i| {
            format!("{}: {}", i.name, i.issue)
        })?;
        section(f, "invalidModelSlugs", &self.invalid_model_slugs, |i| {
            format!("{}: {}", i.name, i.issue)
        })?;
        section(f, "duplicateFieldNames", &self.duplicate_field_names, |i| {
            format!("{}.{}: {}", i.model_name, i.name, i.issue)
        })?;
        section(f, "missingDisplayValues", &self.missing_display_values, |i| {
            format!("{}: {}", i.name, i.issue)
        })?;
        section(f, "missingVisibleFields", &self.missing_visible_fields, |i| {
            format!("{}: {}", i.name, i.issue)
        })?;
        section(f, "missingClickableLinks", &self.missing_clickable_links, |i| {
            format!("{}: {}", i.name, i.issue)
        })?;
        section(f, "multipleClickableLinks", &self.multiple_clickable_links, |i| {
            format!("{}: {} (count: {})", i.name, i.issue, i.count)
        })?;
        section(
            f,
            "invalidClickableLinkOrders",
            &self.invalid_clickable_link_orders,
            |i| format!("{}.{}: {} (order: {})", i.model_name, i.name, i.issue, i.order),
        )?;
        section(f, "invalidIndexCounts", &self.invalid_index_counts, |i| {
            format!("{}: {} (count: {})", i.name, i.issue, i.count)
        })?;
        section(f, "invalidFieldNames", &self.invalid_field_names, |i| {
            format!("{}.{}: {}", i.model_name, i.name, i.issue)
        })?;
        section(f, "unflaggedUuidFields", &self.unflagged_uuid_fields, |i| {
            format!("{}.{}: {}", i.model_name, i.name, i.issue)
        })?;
        section(f, "invalidUuidLengths", &self.invalid_uuid_lengths, |i| {
            format!("{}.{}: {}", i.model_name, i.name, i.issue)
        })?;
        section(f, "missingEnumRefs", &self.missing_enum_refs, |i| {
            format!("{}.{}: {}", i.model_name, i.name, i.issue)
        })?;
        section(
            f,
            "invalidInternalForeignKeys",
            &self.invalid_internal_foreign_keys,
            |i| format!("{}.{}: {}", i.model_name, i.name, i.issue),
        )?;
        section(
            f,
            "invalidExternalForeignKeys",
            &self.invalid_external_foreign_keys,
            |i| {
                format!(
                    "{}.{}: {} (missing: {})",
                    i.model_name,
                    i.name,
                    i.issue,
                    i.missing_fields.join(", ")
                )
            },
        )?;
        section(
            f,
            "nonOptionalSelfReferences",
            &self.non_optional_self_references,
            |i| format!("{}.{}: {}", i.model_name, i.name, i.issue),
        )?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
