//! Configuration validator
//!
//! Walks a microservice's model/field graph once, applying the full set of
//! structural rule checks. This is a collect-all validator: every check runs
//! to completion and appends to its own report category, so a single call
//! surfaces every violation at once. The walk is read-only; data problems are
//! reported, never thrown.

use std::collections::HashMap;

use crate::field::{MAX_CLICKABLE_ORDER, MAX_INDEXED_FIELDS, RESERVED_FIELD_NAMES};
use crate::model::{template_has_no_custom_chars, template_placeholders};
use crate::report::{
    ClickableOrderIssue, CountIssue, DisplayValueIssue, ExternalFkIssue, FieldIssue,
    FieldNameIssue, ModelIssue, ModelNameIssue, NameIssue, ValidationReport,
};
use crate::{FieldDefn, Menu, Microservice, Model};
use forge_core::{naming, DataType, ForeignKeyTarget};

// ============================================================================
// Validator
// ============================================================================

/// Rule-based configuration validator.
///
/// Stateless; construct once and call [`validate`](Validator::validate) with
/// any microservice graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a microservice graph against all rules.
    ///
    /// `menus` is the navigation-menu set fetched for this microservice; an
    /// empty set is itself a violation (every microservice must be reachable
    /// from at least one menu).
    pub fn validate(&self, microservice: &Microservice, menus: &[Menu]) -> ValidationReport {
        let mut report = ValidationReport::new();

        self.check_microservice(microservice, menus, &mut report);
        self.check_duplicate_model_names(microservice, &mut report);

        for model in &microservice.models {
            self.check_model_basics(model, &mut report);
            self.check_display_value(model, &mut report);
            self.check_visible_fields(model, &mut report);
            self.check_clickable_links(model, &mut report);
            self.check_index_count(model, &mut report);

            for field in &model.field_defns {
                self.check_field_name(model, field, &mut report);
                self.check_field_shape(microservice, model, field, &mut report);
            }
        }

        report
    }

    // ====================================================================
    // Microservice-level checks
    // ====================================================================

    fn check_microservice(
        &self,
        microservice: &Microservice,
        menus: &[Menu],
        report: &mut ValidationReport,
    ) {
        if !naming::is_domain_label(&microservice.name) {
            report.invalid_microservice_name = Some(NameIssue {
                name: microservice.name.clone(),
                issue: "Microservice name must be a lowercase domain label (letters, digits, \
                        single hyphens)."
                    .to_string(),
                suggestion: naming::suggest_domain_label(&microservice.name),
            });
        }

        if microservice.label.trim().is_empty() {
            report.missing_microservice_label = true;
        }

        if menus.is_empty() {
            report.missing_menus = true;
        }
    }

    fn check_duplicate_model_names(
        &self,
        microservice: &Microservice,
        report: &mut ValidationReport,
    ) {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for model in &microservice.models {
            let key = model.name.to_lowercase();
            let count = seen.entry(key).or_insert(0);
            *count += 1;
            if *count > 1 {
                report.duplicate_model_names.push(ModelIssue {
                    id: model.id,
                    name: model.name.clone(),
                    issue: format!(
                        "Model name '{}' is used by more than one model. Rename one of them.",
                        model.name
                    ),
                });
            }
        }
    }

    // ====================================================================
    // Model-level checks
    // ====================================================================

    fn check_model_basics(&self, model: &Model, report: &mut ValidationReport) {
        if model.label.trim().is_empty() {
            report.missing_model_labels.push(ModelIssue {
                id: model.id,
                name: model.name.clone(),
                issue: "Model label must not be empty. Set a display label.".to_string(),
            });
        }

        if model.field_defns.is_empty() {
            report.missing_model_fields.push(ModelIssue {
                id: model.id,
                name: model.name.clone(),
                issue: "Model has no fields. Add at least one field.".to_string(),
            });
        }

        let not_start_case = !naming::is_start_case(&model.name);
        let not_singular = !naming::is_singular(&model.name);
        if not_start_case || not_singular {
            let mut problems = Vec::new();
            if not_start_case {
                problems.push("must be Start Case");
            }
            if not_singular {
                problems.push("must be singular");
            }
            let suggestion = naming::singularize(&naming::suggest_start_case(&model.name));
            report.invalid_model_names.push(ModelNameIssue {
                id: model.id,
                name: model.name.clone(),
                issue: format!(
                    "Model name {}. Consider '{}'.",
                    problems.join(" and "),
                    suggestion
                ),
                not_start_case,
                not_singular,
                suggestion,
            });
        }

        if let Some(slug) = model.slug.as_deref() {
            if !naming::is_kebab_slug(slug) {
                report.invalid_model_slugs.push(ModelIssue {
                    id: model.id,
                    name: model.name.clone(),
                    issue: format!(
                        "Slug '{}' must be kebab-case. Consider '{}'.",
                        slug,
                        naming::suggest_kebab_slug(slug)
                    ),
                });
            }
        }

        // Duplicate field names within the model
        let mut seen: HashMap<String, usize> = HashMap::new();
        for field in &model.field_defns {
            let key = field.name.to_lowercase();
            let count = seen.entry(key).or_insert(0);
            *count += 1;
            if *count > 1 {
                report.duplicate_field_names.push(FieldIssue {
                    id: field.id,
                    model_id: model.id,
                    model_name: model.name.clone(),
                    name: field.name.clone(),
                    issue: format!(
                        "Field name '{}' is used more than once in this model. Rename it.",
                        field.name
                    ),
                });
            }
        }
    }

    /// Display-value resolution.
    ///
    /// Template rule: every referenced field must be required — unless the
    /// template contains no literal characters outside its placeholders and
    /// the first referenced field is required, in which case later optional
    /// fields are tolerated. That exception is long-standing behavior and is
    /// preserved exactly; do not widen it to templates with literal text.
    fn check_display_value(&self, model: &Model, report: &mut ValidationReport) {
        if model.field_defns.is_empty() {
            // Already reported as missingModelFields; a display check would
            // only produce noise.
            return;
        }

        match (&model.display_value_id, &model.display_value_template) {
            (Some(field_id), None) => {
                match model.field_by_id(*field_id) {
                    Some(field) if field.is_optional => {
                        report.missing_display_values.push(DisplayValueIssue {
                            id: model.id,
                            name: model.name.clone(),
                            issue: format!(
                                "Display value field '{}' must be required, not optional.",
                                field.name
                            ),
                            optional_fields: vec![field.name.clone()],
                            unresolved_fields: Vec::new(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        report.missing_display_values.push(DisplayValueIssue {
                            id: model.id,
                            name: model.name.clone(),
                            issue: "Display value references a field that no longer exists. \
                                    Pick an existing field."
                                .to_string(),
                            optional_fields: Vec::new(),
                            unresolved_fields: vec![field_id.to_string()],
                        });
                    }
                }
            }
            (None, Some(template)) => {
                let placeholders = template_placeholders(template);
                if placeholders.is_empty() {
                    report.missing_display_values.push(DisplayValueIssue {
                        id: model.id,
                        name: model.name.clone(),
                        issue: "Display template contains no placeholders. Reference at least \
                                one field as '{fieldName}'."
                            .to_string(),
                        optional_fields: Vec::new(),
                        unresolved_fields: Vec::new(),
                    });
                    return;
                }

                let mut unresolved = Vec::new();
                let mut optional = Vec::new();
                let relaxed = template_has_no_custom_chars(template);

                for (position, placeholder) in placeholders.iter().enumerate() {
                    match model.field_by_name(placeholder) {
                        None => unresolved.push((*placeholder).to_string()),
                        Some(field) if field.is_optional => {
                            // Relaxed templates tolerate optional fields after
                            // a required first field.
                            let tolerated = relaxed
                                && position > 0
                                && placeholders
                                    .first()
                                    .and_then(|first| model.field_by_name(first))
                                    .is_some_and(|first| !first.is_optional);
                            if !tolerated {
                                optional.push(field.name.clone());
                            }
                        }
                        Some(_) => {}
                    }
                }

                if !unresolved.is_empty() || !optional.is_empty() {
                    let mut problems = Vec::new();
                    if !unresolved.is_empty() {
                        problems.push(format!(
                            "placeholders [{}] do not resolve to fields",
                            unresolved.join(", ")
                        ));
                    }
                    if !optional.is_empty() {
                        problems.push(format!(
                            "referenced fields [{}] must be required",
                            optional.join(", ")
                        ));
                    }
                    report.missing_display_values.push(DisplayValueIssue {
                        id: model.id,
                        name: model.name.clone(),
                        issue: format!("Display template invalid: {}.", problems.join("; ")),
                        optional_fields: optional,
                        unresolved_fields: unresolved,
                    });
                }
            }
            (Some(_), Some(_)) => {
                report.missing_display_values.push(DisplayValueIssue {
                    id: model.id,
                    name: model.name.clone(),
                    issue: "Both a display field and a display template are configured. \
                            Exactly one strategy applies; remove one."
                        .to_string(),
                    optional_fields: Vec::new(),
                    unresolved_fields: Vec::new(),
                });
            }
            (None, None) => {
                report.missing_display_values.push(DisplayValueIssue {
                    id: model.id,
                    name: model.name.clone(),
                    issue: "No display value configured. Pick a required field or set a \
                            display template."
                        .to_string(),
                    optional_fields: Vec::new(),
                    unresolved_fields: Vec::new(),
                });
            }
        }
    }

    fn check_visible_fields(&self, model: &Model, report: &mut ValidationReport) {
        if model.field_defns.is_empty() {
            return;
        }
        if !model.field_defns.iter().any(FieldDefn::fully_visible) {
            report.missing_visible_fields.push(ModelIssue {
                id: model.id,
                name: model.name.clone(),
                issue: "At least one field must be visible in both the table and the detail \
                        card."
                    .to_string(),
            });
        }
    }

    fn check_clickable_links(&self, model: &Model, report: &mut ValidationReport) {
        if model.field_defns.is_empty() {
            return;
        }
        let clickable = model.clickable_fields();
        match clickable.len() {
            0 => report.missing_clickable_links.push(ModelIssue {
                id: model.id,
                name: model.name.clone(),
                issue: "Exactly one field must be the clickable link. Mark one field as \
                        clickable."
                    .to_string(),
            }),
            1 => {
                let field = clickable[0];
                if field.order > MAX_CLICKABLE_ORDER || field.order < 0 {
                    report.invalid_clickable_link_orders.push(ClickableOrderIssue {
                        id: field.id,
                        model_id: model.id,
                        model_name: model.name.clone(),
                        name: field.name.clone(),
                        issue: format!(
                            "Clickable link order must be between 0 and {}.",
                            MAX_CLICKABLE_ORDER
                        ),
                        order: field.order,
                    });
                }
            }
            count => report.multiple_clickable_links.push(CountIssue {
                id: model.id,
                name: model.name.clone(),
                issue: "Only one field per model may be the clickable link. Unmark the extras."
                    .to_string(),
                count,
            }),
        }
    }

    fn check_index_count(&self, model: &Model, report: &mut ValidationReport) {
        let count = model.indexed_fields().count();
        if count > MAX_INDEXED_FIELDS {
            report.invalid_index_counts.push(CountIssue {
                id: model.id,
                name: model.name.clone(),
                issue: format!(
                    "At most {} fields per model may be indexed. Remove indexes from the \
                     least-queried fields.",
                    MAX_INDEXED_FIELDS
                ),
                count,
            });
        }
    }

    // ====================================================================
    // Field-level checks
    // ====================================================================

    fn check_field_name(&self, model: &Model, field: &FieldDefn, report: &mut ValidationReport) {
        let not_camel_case = !naming::is_camel_case(&field.name);
        let has_trailing_id = naming::has_trailing_id(&field.name);
        let is_reserved = field.name != "id"
            && RESERVED_FIELD_NAMES.contains(&field.name.as_str());

        if !(not_camel_case || has_trailing_id || is_reserved) {
            return;
        }

        let mut problems = Vec::new();
        if not_camel_case {
            problems.push("must be camelCase".to_string());
        }
        if has_trailing_id {
            problems.push("must not end in 'Id' (relation names own that suffix)".to_string());
        }
        if is_reserved {
            problems.push(format!("'{}' is reserved for generated columns", field.name));
        }

        let suggestion =
            naming::strip_trailing_id(&naming::suggest_camel_case(&field.name)).to_string();
        report.invalid_field_names.push(FieldNameIssue {
            id: field.id,
            model_id: model.id,
            model_name: model.name.clone(),
            name: field.name.clone(),
            issue: format!(
                "Field name {}. Consider '{}'.",
                problems.join(" and "),
                suggestion
            ),
            not_camel_case,
            has_trailing_id,
            is_reserved,
            suggestion,
        });
    }

    fn check_field_shape(
        &self,
        microservice: &Microservice,
        model: &Model,
        field: &FieldDefn,
        report: &mut ValidationReport,
    ) {
        let field_issue = |issue: String| FieldIssue {
            id: field.id,
            model_id: model.id,
            model_name: model.name.clone(),
            name: field.name.clone(),
            issue,
        };

        // Bare UUID fields need either the FK flag, the reserved `id` name,
        // or an explicit external-reference description.
        if field.data_type == DataType::Uuid
            && !field.is_foreign_key
            && !field.is_primary_key()
            && !field.described_as_external_ref()
        {
            report.unflagged_uuid_fields.push(field_issue(
                "UUID field is not a foreign key. Mark it as one, or describe it as an \
                 external reference."
                    .to_string(),
            ));
        }

        // UUID fields never carry length constraints.
        if field.data_type == DataType::Uuid
            && (field.min_length.is_some() || field.max_length.is_some())
        {
            report.invalid_uuid_lengths.push(field_issue(
                "UUID fields must not have min/max length constraints. Clear them.".to_string(),
            ));
        }

        // Enum fields must name their enum definition.
        if field.data_type == DataType::Enum {
            match field.enum_defn_id {
                None => report.missing_enum_refs.push(field_issue(
                    "Enum field has no enum definition. Select one.".to_string(),
                )),
                Some(enum_id) if microservice.enum_by_id(enum_id).is_none() => {
                    report.missing_enum_refs.push(field_issue(
                        "Enum field references an enum definition that does not exist in this \
                         microservice."
                            .to_string(),
                    ));
                }
                Some(_) => {}
            }
        }

        if !field.is_foreign_key {
            return;
        }

        // Foreign keys are always UUID-typed.
        if field.data_type != DataType::Uuid {
            let issue = format!(
                "Foreign key data type must be UUID, found {}. Change the data type.",
                field.data_type
            );
            match field.foreign_key_target {
                Some(ForeignKeyTarget::External) => {
                    report.invalid_external_foreign_keys.push(ExternalFkIssue {
                        id: field.id,
                        model_id: model.id,
                        model_name: model.name.clone(),
                        name: field.name.clone(),
                        issue,
                        missing_fields: Vec::new(),
                    });
                }
                _ => report.invalid_internal_foreign_keys.push(field_issue(issue)),
            }
        }

        match field.foreign_key_target {
            None => {
                report.invalid_internal_foreign_keys.push(field_issue(
                    "Foreign key has no target kind. Set it to Internal or External."
                        .to_string(),
                ));
            }
            Some(ForeignKeyTarget::Internal) => {
                match field.foreign_key_model_id {
                    None => report.invalid_internal_foreign_keys.push(field_issue(
                        "Internal foreign key has no target model. Select one.".to_string(),
                    )),
                    Some(target_id) => {
                        if microservice.model_by_id(target_id).is_none() {
                            report.invalid_internal_foreign_keys.push(field_issue(
                                "Internal foreign key targets a model outside this \
                                 microservice. Use an external foreign key instead."
                                    .to_string(),
                            ));
                        }
                        // Self-referencing FKs must be optional or no row can
                        // ever be inserted first.
                        if target_id == model.id && !field.is_optional {
                            report.non_optional_self_references.push(field_issue(
                                "Self-referencing foreign key must be optional.".to_string(),
                            ));
                        }
                    }
                }
                if field.external_model_id.is_some() || field.external_microservice_id.is_some() {
                    report.invalid_internal_foreign_keys.push(field_issue(
                        "Internal foreign key must not carry external reference properties. \
                         Clear them."
                            .to_string(),
                    ));
                }
            }
            Some(ForeignKeyTarget::External) => {
                let mut missing = Vec::new();
                if field.external_model_id.is_none() {
                    missing.push("externalModelId".to_string());
                }
                if field.external_microservice_id.is_none() {
                    missing.push("externalMicroserviceId".to_string());
                }
                if !missing.is_empty() {
                    report.invalid_external_foreign_keys.push(ExternalFkIssue {
                        id: field.id,
                        model_id: model.id,
                        model_name: model.name.clone(),
                        name: field.name.clone(),
                        issue: format!(
                            "External foreign key is missing required properties: {}.",
                            missing.join(", ")
                        ),
                        missing_fields: missing,
                    });
                }
                if field.foreign_key_model_id.is_some() {
                    report.invalid_external_foreign_keys.push(ExternalFkIssue {
                        id: field.id,
                        model_id: model.id,
                        model_name: model.name.clone(),
                        name: field.name.clone(),
                        issue: "External foreign key must not carry an internal target model. \
                                Clear it."
                            .to_string(),
                        missing_fields: Vec::new(),
                    });
                }
            }
        }
    }
}

/// Validate a microservice with the default validator.
pub fn validate(microservice: &Microservice, menus: &[Menu]) -> ValidationReport {
    Validator::new().validate(microservice, menus)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnumDefn, FieldDefn, Menu, Microservice, Model};
    use forge_core::DataType;
    use uuid::Uuid;

    /// A microservice that passes every check.
    fn clean_microservice() -> Microservice {
        let number = FieldDefn::new("number", DataType::String).clickable(0);
        let number_id = number.id;
        let invoice = Model::new("Invoice")
            .with_field(number)
            .with_display_field(number_id);
        Microservice::new("billing", "Billing").with_model(invoice)
    }

    fn menus() -> Vec<Menu> {
        vec![Menu::new("Invoices")]
    }

    #[test]
    fn test_clean_microservice_has_no_errors() {
        let report = validate(&clean_microservice(), &menus());
        assert!(!report.has_errors(), "unexpected issues: {}", report);
    }

    #[test]
    fn test_validator_is_idempotent() {
        let ms = clean_microservice();
        let first = validate(&ms, &[]);
        let second = validate(&ms, &[]);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_microservice_name_suggestion() {
        let mut ms = clean_microservice();
        ms.name = "Billing Service".to_string();
        let report = validate(&ms, &menus());

        let issue = report.invalid_microservice_name.expect("name issue");
        assert_eq!(issue.suggestion, "billing-service");
    }

    #[test]
    fn test_missing_label_and_menus() {
        let mut ms = clean_microservice();
        ms.label = "  ".to_string();
        let report = validate(&ms, &[]);

        assert!(report.missing_microservice_label);
        assert!(report.missing_menus);
    }

    #[test]
    fn test_collect_all_reports_every_violation() {
        // Three independent violations: bad model name, duplicate field name,
        // missing display value. One call must surface all three.
        let mut ms = Microservice::new("billing", "Billing");
        let model = Model::new("invoices")
            .with_field(FieldDefn::new("amount", DataType::Decimal).clickable(0))
            .with_field(FieldDefn::new("amount", DataType::Decimal));
        ms.models.push(model);

        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_model_names.len(), 1);
        assert_eq!(report.duplicate_field_names.len(), 1);
        assert_eq!(report.missing_display_values.len(), 1);
        assert!(report.issue_count() >= 3);
    }

    #[test]
    fn test_duplicate_model_names() {
        let mut ms = clean_microservice();
        let dup = ms.models[0].clone();
        ms.models.push(dup);
        let report = validate(&ms, &menus());

        // The later occurrence is flagged
        assert_eq!(report.duplicate_model_names.len(), 1);
    }

    #[test]
    fn test_model_name_flags() {
        let mut ms = clean_microservice();
        ms.models[0].name = "bank accounts".to_string();
        let report = validate(&ms, &menus());

        let issue = &report.invalid_model_names[0];
        assert!(issue.not_start_case);
        assert!(issue.not_singular);
        assert_eq!(issue.suggestion, "Bank Account");
    }

    #[test]
    fn test_invalid_slug() {
        let mut ms = clean_microservice();
        ms.models[0].slug = Some("Bank Account".to_string());
        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_model_slugs.len(), 1);
    }

    #[test]
    fn test_empty_model() {
        let ms = Microservice::new("billing", "Billing").with_model(Model::empty("Invoice"));
        let report = validate(&ms, &menus());

        assert_eq!(report.missing_model_fields.len(), 1);
        // Empty models produce no display/visibility/clickable noise
        assert!(report.missing_display_values.is_empty());
        assert!(report.missing_visible_fields.is_empty());
        assert!(report.missing_clickable_links.is_empty());
    }

    // ── Display value ────────────────────────────────────────────────────

    #[test]
    fn test_template_display_required_field_passes() {
        let mut ms = clean_microservice();
        ms.models[0] = Model::new("Invoice")
            .with_field(FieldDefn::new("number", DataType::String).clickable(0))
            .with_display_template("{number}");
        let report = validate(&ms, &menus());
        assert!(report.missing_display_values.is_empty());
    }

    #[test]
    fn test_template_display_optional_field_flagged() {
        let mut ms = clean_microservice();
        ms.models[0] = Model::new("Invoice")
            .with_field(FieldDefn::new("number", DataType::String).optional().clickable(0))
            .with_display_template("{number}");
        let report = validate(&ms, &menus());

        let issue = &report.missing_display_values[0];
        assert_eq!(issue.optional_fields, vec!["number".to_string()]);
    }

    #[test]
    fn test_template_no_custom_chars_exception() {
        // "{bankAccount} {date}" has no literal characters; a required first
        // field tolerates the optional second one.
        let bank = FieldDefn::new("bankAccount", DataType::String).clickable(0);
        let date = FieldDefn::new("date", DataType::Date).optional();
        let model = Model::new("Statement")
            .with_field(bank)
            .with_field(date)
            .with_display_template("{bankAccount} {date}");
        let ms = Microservice::new("billing", "Billing").with_model(model);

        let report = validate(&ms, &menus());
        assert!(report.missing_display_values.is_empty());
    }

    #[test]
    fn test_template_with_custom_chars_requires_all_fields() {
        // Same fields, but the template carries a literal separator: the
        // exception does not apply and the optional field is flagged.
        let bank = FieldDefn::new("bankAccount", DataType::String).clickable(0);
        let date = FieldDefn::new("date", DataType::Date).optional();
        let model = Model::new("Statement")
            .with_field(bank)
            .with_field(date)
            .with_display_template("{bankAccount} - {date}");
        let ms = Microservice::new("billing", "Billing").with_model(model);

        let report = validate(&ms, &menus());
        assert_eq!(
            report.missing_display_values[0].optional_fields,
            vec!["date".to_string()]
        );
    }

    #[test]
    fn test_template_unresolved_placeholder() {
        let model = Model::new("Invoice")
            .with_field(FieldDefn::new("number", DataType::String).clickable(0))
            .with_display_template("{number} {ghost}");
        let ms = Microservice::new("billing", "Billing").with_model(model);

        let report = validate(&ms, &menus());
        assert_eq!(
            report.missing_display_values[0].unresolved_fields,
            vec!["ghost".to_string()]
        );
    }

    #[test]
    fn test_single_field_display_must_be_required() {
        let number = FieldDefn::new("number", DataType::String).optional().clickable(0);
        let number_id = number.id;
        let model = Model::new("Invoice")
            .with_field(number)
            .with_display_field(number_id);
        let ms = Microservice::new("billing", "Billing").with_model(model);

        let report = validate(&ms, &menus());
        assert_eq!(
            report.missing_display_values[0].optional_fields,
            vec!["number".to_string()]
        );
    }

    #[test]
    fn test_missing_display_value() {
        let model =
            Model::new("Invoice").with_field(FieldDefn::new("number", DataType::String).clickable(0));
        let ms = Microservice::new("billing", "Billing").with_model(model);

        let report = validate(&ms, &menus());
        assert_eq!(report.missing_display_values.len(), 1);
    }

    // ── Visibility / clickable / index ───────────────────────────────────

    #[test]
    fn test_missing_visible_fields() {
        let number = FieldDefn::new("number", DataType::String)
            .clickable(0)
            .hidden_in_table();
        let number_id = number.id;
        let model = Model::empty("Invoice")
            .with_field(number)
            .with_display_field(number_id);
        let ms = Microservice::new("billing", "Billing").with_model(model);

        let report = validate(&ms, &menus());
        assert_eq!(report.missing_visible_fields.len(), 1);
    }

    #[test]
    fn test_clickable_link_cardinality() {
        // Zero clickable fields
        let mut ms = clean_microservice();
        ms.models[0].field_defns[1].is_clickable_link = false;
        let report = validate(&ms, &menus());
        assert_eq!(report.missing_clickable_links.len(), 1);

        // Three clickable fields
        let mut ms = clean_microservice();
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("note", DataType::Text).clickable(1));
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("memo", DataType::Text).clickable(2));
        let report = validate(&ms, &menus());
        assert_eq!(report.multiple_clickable_links.len(), 1);
        assert_eq!(report.multiple_clickable_links[0].count, 3);
    }

    #[test]
    fn test_clickable_link_order() {
        // order = 3 is out of range
        let mut ms = clean_microservice();
        ms.models[0].field_defns[1].order = 3;
        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_clickable_link_orders.len(), 1);
        assert_eq!(report.invalid_clickable_link_orders[0].order, 3);

        // order = 1 is fine
        let mut ms = clean_microservice();
        ms.models[0].field_defns[1].order = 1;
        let report = validate(&ms, &menus());
        assert!(report.invalid_clickable_link_orders.is_empty());
    }

    #[test]
    fn test_index_ceiling() {
        // 31 indexed fields → flagged with the exact count
        let mut model = Model::empty("Invoice");
        let number = FieldDefn::new("number", DataType::String).clickable(0).indexed();
        let number_id = number.id;
        model.field_defns.push(number);
        for i in 0..30 {
            model
                .field_defns
                .push(FieldDefn::new(format!("extra{}", i), DataType::Int).indexed());
        }
        let model = model.with_display_field(number_id);
        let ms = Microservice::new("billing", "Billing").with_model(model);

        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_index_counts.len(), 1);
        assert_eq!(report.invalid_index_counts[0].count, 31);

        // Exactly 30 is fine
        let mut ms = ms;
        ms.models[0].field_defns.pop();
        let report = validate(&ms, &menus());
        assert!(report.invalid_index_counts.is_empty());
    }

    // ── Field names ──────────────────────────────────────────────────────

    #[test]
    fn test_field_name_flags() {
        let mut ms = clean_microservice();
        let target = ms.models[0].id;
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("BankAccountId", DataType::Uuid).internal_fk(target));
        let report = validate(&ms, &menus());

        let issue = &report.invalid_field_names[0];
        assert!(issue.not_camel_case);
        assert!(issue.has_trailing_id);
        assert!(!issue.is_reserved);
        assert_eq!(issue.suggestion, "bankAccount");
    }

    #[test]
    fn test_reserved_field_name() {
        let mut ms = clean_microservice();
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("createdAt", DataType::DateTime));
        let report = validate(&ms, &menus());

        assert!(report.invalid_field_names[0].is_reserved);
    }

    #[test]
    fn test_id_field_is_exempt() {
        // The primary key "id" is reserved but legal
        let report = validate(&clean_microservice(), &menus());
        assert!(report.invalid_field_names.is_empty());
    }

    // ── Field shapes ─────────────────────────────────────────────────────

    #[test]
    fn test_unflagged_uuid_field() {
        let mut ms = clean_microservice();
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("token", DataType::Uuid));
        let report = validate(&ms, &menus());
        assert_eq!(report.unflagged_uuid_fields.len(), 1);

        // A described external reference is tolerated
        let mut ms = clean_microservice();
        ms.models[0].field_defns.push(
            FieldDefn::new("token", DataType::Uuid)
                .with_description("External reference to the payment session"),
        );
        let report = validate(&ms, &menus());
        assert!(report.unflagged_uuid_fields.is_empty());
    }

    #[test]
    fn test_uuid_length_constraints() {
        let mut ms = clean_microservice();
        let model_id = ms.models[0].id;
        ms.models[0].field_defns.push(
            FieldDefn::new("parent", DataType::Uuid)
                .internal_fk(model_id)
                .optional()
                .with_length(Some(4), Some(36)),
        );
        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_uuid_lengths.len(), 1);
    }

    #[test]
    fn test_enum_refs() {
        let mut ms = clean_microservice();
        let mut status = FieldDefn::new("status", DataType::Enum);
        status.enum_defn_id = None;
        ms.models[0].field_defns.push(status);
        let report = validate(&ms, &menus());
        assert_eq!(report.missing_enum_refs.len(), 1);

        // Dangling reference
        let mut ms = clean_microservice();
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("status", DataType::String).with_enum(Uuid::new_v4()));
        let report = validate(&ms, &menus());
        assert_eq!(report.missing_enum_refs.len(), 1);

        // Resolvable reference
        let status_enum = EnumDefn::new("Status", vec!["Open".to_string()]);
        let enum_id = status_enum.id;
        let mut ms = clean_microservice().with_enum(status_enum);
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("status", DataType::String).with_enum(enum_id));
        let report = validate(&ms, &menus());
        assert!(report.missing_enum_refs.is_empty());
    }

    #[test]
    fn test_fk_requires_uuid_data_type() {
        let mut ms = clean_microservice();
        let model_id = ms.models[0].id;
        let mut fk = FieldDefn::new("parent", DataType::String).optional();
        fk.is_foreign_key = true;
        fk.foreign_key_target = Some(ForeignKeyTarget::Internal);
        fk.foreign_key_model_id = Some(model_id);
        ms.models[0].field_defns.push(fk);

        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_internal_foreign_keys.len(), 1);
    }

    #[test]
    fn test_internal_fk_shapes() {
        // Missing target model
        let mut ms = clean_microservice();
        let mut fk = FieldDefn::new("parent", DataType::Uuid).optional();
        fk.is_foreign_key = true;
        fk.foreign_key_target = Some(ForeignKeyTarget::Internal);
        ms.models[0].field_defns.push(fk);
        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_internal_foreign_keys.len(), 1);

        // Target model not in this microservice
        let mut ms = clean_microservice();
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("parent", DataType::Uuid).internal_fk(Uuid::new_v4()).optional());
        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_internal_foreign_keys.len(), 1);

        // Internal FK carrying external properties
        let mut ms = clean_microservice();
        let model_id = ms.models[0].id;
        let mut fk = FieldDefn::new("parent", DataType::Uuid)
            .internal_fk(model_id)
            .optional();
        fk.external_model_id = Some(Uuid::new_v4());
        ms.models[0].field_defns.push(fk);
        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_internal_foreign_keys.len(), 1);
    }

    #[test]
    fn test_external_fk_missing_fields() {
        let mut ms = clean_microservice();
        let mut fk = FieldDefn::new("customer", DataType::Uuid);
        fk.is_foreign_key = true;
        fk.foreign_key_target = Some(ForeignKeyTarget::External);
        fk.external_model_id = Some(Uuid::new_v4());
        ms.models[0].field_defns.push(fk);

        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_external_foreign_keys.len(), 1);
        assert_eq!(
            report.invalid_external_foreign_keys[0].missing_fields,
            vec!["externalMicroserviceId".to_string()]
        );
    }

    #[test]
    fn test_external_fk_with_internal_target() {
        let mut ms = clean_microservice();
        let model_id = ms.models[0].id;
        let mut fk = FieldDefn::new("customer", DataType::Uuid)
            .external_fk(Uuid::new_v4(), Uuid::new_v4());
        fk.foreign_key_model_id = Some(model_id);
        ms.models[0].field_defns.push(fk);

        let report = validate(&ms, &menus());
        assert_eq!(report.invalid_external_foreign_keys.len(), 1);
        assert!(report.invalid_external_foreign_keys[0]
            .missing_fields
            .is_empty());
    }

    #[test]
    fn test_self_reference_must_be_optional() {
        let mut ms = clean_microservice();
        let model_id = ms.models[0].id;

        // Required self-reference → exactly one issue
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("parent", DataType::Uuid).internal_fk(model_id));
        let report = validate(&ms, &menus());
        assert_eq!(report.non_optional_self_references.len(), 1);

        // Optional self-reference → clean
        let mut ms = clean_microservice();
        ms.models[0]
            .field_defns
            .push(FieldDefn::new("parent", DataType::Uuid).internal_fk(model_id).optional());
        let report = validate(&ms, &menus());
        assert!(report.non_optional_self_references.is_empty());
    }
}
