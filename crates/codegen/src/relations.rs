//! Relation resolution for generated read paths
//!
//! A model's list and detail views render each foreign key as the target
//! model's display value. When that display value is itself a foreign key,
//! rendering needs the next hop too, so include clauses nest. Resolution
//! walks those display chains with an explicit visited set: a model id seen
//! twice terminates the chain with a flat clause instead of recursing, which
//! makes cyclic graphs (A displays B, B displays A) resolve finitely.
//!
//! Display chains that end at an external foreign key cannot be joined
//! locally; they are collected as nested fields for runtime resolution.

use std::collections::HashSet;

use forge_core::{naming, MicroserviceId, ModelId};
use forge_ir::{template_placeholders, DisplayStrategy, FieldDefn, Microservice, Model};

// ============================================================================
// Plan Types
// ============================================================================

/// One relation to include when querying a model, possibly nested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeClause {
    /// Relation name, identical to the foreign-key field name
    pub relation_name: String,

    /// Sub-relations needed to render the target's display value
    pub nested: Vec<IncludeClause>,
}

impl IncludeClause {
    fn flat(relation_name: impl Into<String>) -> Self {
        Self {
            relation_name: relation_name.into(),
            nested: Vec::new(),
        }
    }

    /// Render as a query-include fragment: `name` or `name: { inner }`
    pub fn render(&self) -> String {
        if self.nested.is_empty() {
            format!("{}: true", self.relation_name)
        } else {
            let inner: Vec<String> = self.nested.iter().map(IncludeClause::render).collect();
            format!(
                "{}: {{ include: {{ {} }} }}",
                self.relation_name,
                inner.join(", ")
            )
        }
    }
}

/// A display chain that leaves the microservice at an external foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedField {
    /// Relation path from the root model, outermost first
    pub path: Vec<String>,

    /// External model the chain ends at
    pub external_model_id: ModelId,

    /// Microservice owning that model
    pub external_microservice_id: MicroserviceId,
}

/// Everything the generated read path needs to know about a model's relations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationPlan {
    /// Names of the model's internal foreign-key fields, in field order
    pub internal_fk_fields: Vec<String>,

    /// Include clauses for the query layer, in field order
    pub include_clauses: Vec<IncludeClause>,

    /// Display chains requiring runtime resolution against other services
    pub nested_fields: Vec<NestedField>,
}

impl RelationPlan {
    /// Render all include clauses as one fragment
    pub fn render_includes(&self) -> String {
        let clauses: Vec<String> = self.include_clauses.iter().map(IncludeClause::render).collect();
        clauses.join(", ")
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the relation plan for one model within its microservice.
pub fn resolve_relations(model: &Model, microservice: &Microservice) -> RelationPlan {
    let mut plan = RelationPlan::default();
    let mut visited = HashSet::new();
    visited.insert(model.id);

    for field in &model.field_defns {
        if !field.is_internal_fk() {
            continue;
        }
        // Only keys into this microservice join locally. A missing or
        // dangling target is a validator finding; the plan leaves it out.
        let Some(target_id) = field.foreign_key_model_id else {
            continue;
        };
        let Some(target) = microservice.model_by_id(target_id) else {
            continue;
        };
        plan.internal_fk_fields.push(field.name.clone());

        let mut path = vec![field.name.clone()];
        let nested = display_includes(target, microservice, &mut visited.clone(), &mut path, &mut plan.nested_fields);
        plan.include_clauses.push(IncludeClause {
            relation_name: field.name.clone(),
            nested,
        });
    }

    plan
}

/// Include clauses needed to render `model`'s display value.
///
/// `visited` carries every model id already on the chain; re-entering one
/// terminates with a flat clause.
fn display_includes(
    model: &Model,
    microservice: &Microservice,
    visited: &mut HashSet<ModelId>,
    path: &mut Vec<String>,
    nested_fields: &mut Vec<NestedField>,
) -> Vec<IncludeClause> {
    if !visited.insert(model.id) {
        return Vec::new();
    }

    let mut clauses = Vec::new();
    match model.display_strategy() {
        DisplayStrategy::Field(field_id) => {
            if let Some(field) = model.field_by_id(field_id) {
                follow_field(field, microservice, visited, path, nested_fields, &mut clauses);
            }
        }
        DisplayStrategy::Template(template) => {
            for placeholder in template_placeholders(template) {
                // Placeholders may carry a legacy trailing-Id spelling of the
                // relation field.
                let field = model
                    .field_by_name(placeholder)
                    .or_else(|| model.field_by_name(naming::strip_trailing_id(placeholder)));
                if let Some(field) = field {
                    follow_field(field, microservice, visited, path, nested_fields, &mut clauses);
                }
            }
        }
        DisplayStrategy::None => {}
    }
    clauses
}

fn follow_field(
    field: &FieldDefn,
    microservice: &Microservice,
    visited: &mut HashSet<ModelId>,
    path: &mut Vec<String>,
    nested_fields: &mut Vec<NestedField>,
    clauses: &mut Vec<IncludeClause>,
) {
    if field.is_external_fk() {
        if let (Some(external_model_id), Some(external_microservice_id)) =
            (field.external_model_id, field.external_microservice_id)
        {
            let mut full_path = path.clone();
            full_path.push(field.name.clone());
            nested_fields.push(NestedField {
                path: full_path,
                external_model_id,
                external_microservice_id,
            });
        }
        return;
    }

    if !field.is_internal_fk() {
        return;
    }

    let Some(target_id) = field.foreign_key_model_id else {
        return;
    };
    // Revisiting a model already on this chain stops the recursion flat
    if visited.contains(&target_id) {
        clauses.push(IncludeClause::flat(&field.name));
        return;
    }
    let Some(target) = microservice.model_by_id(target_id) else {
        return;
    };

    path.push(field.name.clone());
    let nested = display_includes(target, microservice, visited, path, nested_fields);
    path.pop();
    clauses.push(IncludeClause {
        relation_name: field.name.clone(),
        nested,
    });
}

// ============================================================================
// Tests
// ============================================================================
