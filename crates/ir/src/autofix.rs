//! Auto-fix planning and application
//!
//! A subset of validation findings have a single obvious remediation. This
//! module plans those fixes from the graph, then applies the whole plan as
//! one transaction against a [`ModelStore`]: every fix is applied to a
//! scratch copy first, and the store only sees the result if all of them
//! succeed. A failing plan leaves the store byte-for-byte unchanged.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::field::MAX_CLICKABLE_ORDER;
use crate::model::DisplayStrategy;
use crate::{Microservice, Model, ValidationReport};
use forge_core::{naming, DataType, EngineError, EngineResult, FieldId, ModelId};

// ============================================================================
// Model store
// ============================================================================

/// Transaction boundary for auto-fix application.
///
/// Implementations expose the current microservice graph and atomically
/// replace it with a repaired one. [`apply_auto_fixes`] never mutates the
/// store directly; it commits a fully repaired copy or nothing.
pub trait ModelStore {
    /// Current microservice graph
    fn microservice(&self) -> &Microservice;

    /// Atomically replace the stored graph
    fn commit(&mut self, microservice: Microservice) -> EngineResult<()>;
}

/// In-memory [`ModelStore`] backed by a single owned graph.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    microservice: Microservice,
}

impl InMemoryStore {
    pub fn new(microservice: Microservice) -> Self {
        Self { microservice }
    }

    /// Consume the store, returning the graph
    pub fn into_inner(self) -> Microservice {
        self.microservice
    }
}

impl ModelStore for InMemoryStore {
    fn microservice(&self) -> &Microservice {
        &self.microservice
    }

    fn commit(&mut self, microservice: Microservice) -> EngineResult<()> {
        self.microservice = microservice;
        Ok(())
    }
}

// ============================================================================
// Fixes
// ============================================================================

/// A single planned remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AutoFix {
    /// Rename the microservice to a valid domain label
    #[serde(rename_all = "camelCase")]
    RenameMicroservice { from: String, to: String },

    /// Rename a model to Start Case. Singularization is never automatic;
    /// a plural name may be intentional and renaming it would cascade into
    /// relation names.
    #[serde(rename_all = "camelCase")]
    RenameModel {
        model_id: ModelId,
        from: String,
        to: String,
    },

    /// Rename a field to camelCase and/or drop a trailing `Id`
    #[serde(rename_all = "camelCase")]
    RenameField {
        model_id: ModelId,
        field_id: FieldId,
        from: String,
        to: String,
    },

    /// Clear min/max length constraints from a UUID field
    #[serde(rename_all = "camelCase")]
    ClearUuidLengths {
        model_id: ModelId,
        field_id: FieldId,
        field: String,
    },

    /// Force a foreign-key field's data type to UUID
    #[serde(rename_all = "camelCase")]
    ForceUuidDataType {
        model_id: ModelId,
        field_id: FieldId,
        field: String,
        from: DataType,
    },

    /// Make a self-referencing foreign key optional
    #[serde(rename_all = "camelCase")]
    MakeSelfReferenceOptional {
        model_id: ModelId,
        field_id: FieldId,
        field: String,
    },

    /// Reset an out-of-range clickable-link order to 0
    #[serde(rename_all = "camelCase")]
    ResetClickableOrder {
        model_id: ModelId,
        field_id: FieldId,
        field: String,
        from: i32,
    },

    /// Mark the single-field display value as the clickable link
    #[serde(rename_all = "camelCase")]
    PromoteDisplayField {
        model_id: ModelId,
        field_id: FieldId,
        field: String,
    },
}

impl AutoFix {
    /// Human-readable description, used in logs and the migration manifest
    pub fn describe(&self) -> String {
        match self {
            Self::RenameMicroservice { from, to } => {
                format!("Renamed microservice '{}' to '{}'", from, to)
            }
            Self::RenameModel { from, to, .. } => {
                format!("Renamed model '{}' to '{}'", from, to)
            }
            Self::RenameField { from, to, .. } => {
                format!("Renamed field '{}' to '{}'", from, to)
            }
            Self::ClearUuidLengths { field, .. } => {
                format!("Cleared length constraints on UUID field '{}'", field)
            }
            Self::ForceUuidDataType { field, from, .. } => {
                format!("Changed foreign key '{}' data type from {} to UUID", field, from)
            }
            Self::MakeSelfReferenceOptional { field, .. } => {
                format!("Made self-referencing foreign key '{}' optional", field)
            }
            Self::ResetClickableOrder { field, from, .. } => {
                format!("Reset clickable link order on '{}' from {} to 0", field, from)
            }
            Self::PromoteDisplayField { field, .. } => {
                format!("Marked display field '{}' as the clickable link", field)
            }
        }
    }
}

/// Outcome of a fix-planning pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixPlan {
    /// Fixes to apply, in application order
    pub fixes: Vec<AutoFix>,

    /// Findings that have no safe automatic remediation
    pub skipped: Vec<String>,
}

impl FixPlan {
    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

// ============================================================================
// Planning
// ============================================================================

/// Plan the automatic remediations for a validated graph.
///
/// The report supplies the name suggestions; structural fixes are re-derived
/// from the graph itself so the plan never depends on parsing issue text.
pub fn plan_fixes(report: &ValidationReport, microservice: &Microservice) -> FixPlan {
    let mut plan = FixPlan::default();

    if let Some(issue) = &report.invalid_microservice_name {
        plan.fixes.push(AutoFix::RenameMicroservice {
            from: issue.name.clone(),
            to: issue.suggestion.clone(),
        });
    }

    for issue in &report.invalid_model_names {
        // Start Case only; plural names are reported but left alone
        if issue.not_start_case {
            plan.fixes.push(AutoFix::RenameModel {
                model_id: issue.id,
                from: issue.name.clone(),
                to: naming::suggest_start_case(&issue.name),
            });
        }
    }

    for issue in &report.invalid_field_names {
        if issue.is_reserved {
            plan.skipped.push(format!(
                "Field '{}' in model '{}' collides with a reserved name; rename it manually",
                issue.name, issue.model_name
            ));
            continue;
        }
        let mut renamed = issue.name.clone();
        if issue.not_camel_case {
            renamed = naming::suggest_camel_case(&renamed);
        }
        if issue.has_trailing_id {
            renamed = naming::strip_trailing_id(&renamed).to_string();
        }
        if renamed != issue.name {
            plan.fixes.push(AutoFix::RenameField {
                model_id: issue.model_id,
                field_id: issue.id,
                from: issue.name.clone(),
                to: renamed,
            });
        }
    }

    for model in &microservice.models {
        plan_model_fixes(model, &mut plan);
    }

    plan
}

fn plan_model_fixes(model: &Model, plan: &mut FixPlan) {
    for field in &model.field_defns {
        // Foreign keys are included: their type is forced to UUID in the
        // same transaction, so stale length constraints go with it.
        if (field.data_type == DataType::Uuid || field.is_foreign_key)
            && (field.min_length.is_some() || field.max_length.is_some())
        {
            plan.fixes.push(AutoFix::ClearUuidLengths {
                model_id: model.id,
                field_id: field.id,
                field: field.name.clone(),
            });
        }

        if field.is_foreign_key && field.data_type != DataType::Uuid {
            plan.fixes.push(AutoFix::ForceUuidDataType {
                model_id: model.id,
                field_id: field.id,
                field: field.name.clone(),
                from: field.data_type,
            });
        }

        if field.is_internal_fk()
            && field.foreign_key_model_id == Some(model.id)
            && !field.is_optional
        {
            plan.fixes.push(AutoFix::MakeSelfReferenceOptional {
                model_id: model.id,
                field_id: field.id,
                field: field.name.clone(),
            });
        }
    }

    let clickable = model.clickable_fields();
    match clickable.len() {
        1 => {
            let field = clickable[0];
            if field.order > MAX_CLICKABLE_ORDER || field.order < 0 {
                plan.fixes.push(AutoFix::ResetClickableOrder {
                    model_id: model.id,
                    field_id: field.id,
                    field: field.name.clone(),
                    from: field.order,
                });
            }
        }
        0 if !model.field_defns.is_empty() => match model.display_strategy() {
            DisplayStrategy::Field(field_id) => {
                if let Some(field) = model.field_by_id(field_id) {
                    plan.fixes.push(AutoFix::PromoteDisplayField {
                        model_id: model.id,
                        field_id,
                        field: field.name.clone(),
                    });
                }
            }
            DisplayStrategy::Template(_) => {
                // A template references several fields; none of them is the
                // obvious link candidate.
                debug!(model = %model.name, "no clickable link and template display; skipping");
                plan.skipped.push(format!(
                    "Model '{}' has no clickable link and a template display value; pick a \
                     link field manually",
                    model.name
                ));
            }
            DisplayStrategy::None => {
                plan.skipped.push(format!(
                    "Model '{}' has no clickable link and no display value; pick a link \
                     field manually",
                    model.name
                ));
            }
        },
        _ => {}
    }
}

// ============================================================================
// Application
// ============================================================================

/// Apply a fix plan as a single transaction.
///
/// Each fix is applied to a scratch copy of the stored graph. If any fix
/// fails — a target renamed away, a stale plan — the store is left untouched
/// and the error is returned. On success the repaired copy is committed and
/// the applied fixes are returned in order.
pub fn apply_auto_fixes<S: ModelStore>(store: &mut S, plan: &FixPlan) -> EngineResult<Vec<AutoFix>> {
    if plan.is_empty() {
        return Ok(Vec::new());
    }

    let mut scratch = store.microservice().clone();
    for fix in &plan.fixes {
        apply_fix(&mut scratch, fix)?;
    }

    store.commit(scratch)?;
    for fix in &plan.fixes {
        info!(fix = %fix.describe(), "applied auto-fix");
    }
    Ok(plan.fixes.clone())
}

fn apply_fix(microservice: &mut Microservice, fix: &AutoFix) -> EngineResult<()> {
    match fix {
        AutoFix::RenameMicroservice { to, .. } => {
            microservice.name = to.clone();
            Ok(())
        }
        AutoFix::RenameModel { model_id, to, .. } => {
            let model = model_mut(microservice, *model_id)?;
            model.name = to.clone();
            Ok(())
        }
        AutoFix::RenameField {
            model_id,
            field_id,
            to,
            ..
        } => {
            let model = model_mut(microservice, *model_id)?;
            // A rename must not introduce a duplicate; bail and leave the
            // transaction to roll back.
            if model
                .field_defns
                .iter()
                .any(|f| f.id != *field_id && f.name.eq_ignore_ascii_case(to))
            {
                return Err(EngineError::DuplicateField {
                    model: model.name.clone(),
                    field: to.clone(),
                });
            }
            let model_name = model.name.clone();
            let field = model
                .field_defns
                .iter_mut()
                .find(|f| f.id == *field_id)
                .ok_or(EngineError::FieldNotFound {
                    model: model_name,
                    field: field_id.to_string(),
                })?;
            field.name = to.clone();
            Ok(())
        }
        AutoFix::ClearUuidLengths {
            model_id, field_id, ..
        } => {
            let (_, field) = field_mut(microservice, *model_id, *field_id)?;
            field.min_length = None;
            field.max_length = None;
            Ok(())
        }
        AutoFix::ForceUuidDataType {
            model_id, field_id, ..
        } => {
            let (_, field) = field_mut(microservice, *model_id, *field_id)?;
            field.data_type = DataType::Uuid;
            Ok(())
        }
        AutoFix::MakeSelfReferenceOptional {
            model_id, field_id, ..
        } => {
            let (_, field) = field_mut(microservice, *model_id, *field_id)?;
            field.is_optional = true;
            Ok(())
        }
        AutoFix::ResetClickableOrder {
            model_id, field_id, ..
        } => {
            let (_, field) = field_mut(microservice, *model_id, *field_id)?;
            field.order = 0;
            Ok(())
        }
        AutoFix::PromoteDisplayField {
            model_id, field_id, ..
        } => {
            let (_, field) = field_mut(microservice, *model_id, *field_id)?;
            field.is_clickable_link = true;
            field.order = 0;
            Ok(())
        }
    }
}

fn model_mut(microservice: &mut Microservice, model_id: ModelId) -> EngineResult<&mut Model> {
    microservice
        .model_by_id_mut(model_id)
        .ok_or_else(|| EngineError::ModelNotFound(model_id.to_string()))
}

fn field_mut(
    microservice: &mut Microservice,
    model_id: ModelId,
    field_id: FieldId,
) -> EngineResult<(String, &mut crate::FieldDefn)> {
    let model = model_mut(microservice, model_id)?;
    let model_name = model.name.clone();
    let field = model
        .field_defns
        .iter_mut()
        .find(|f| f.id == field_id)
        .ok_or_else(|| EngineError::FieldNotFound {
            model: model_name.clone(),
            field: field_id.to_string(),
        })?;
    Ok((model_name, field))
}

// ============================================================================
// Tests
// ============================================================================
