//! Template placeholders and rendering
//!
//! Templates stay flat: no conditionals, no loops, just named tokens. All
//! branching happens while building the values, so a template author only
//! ever sees plain text with `@gen{NAME}` inline tokens and `// @gen:NAME`
//! line tokens. The key set is closed — [`PlaceholderKey`] enumerates every
//! token a template may use, and an unknown token is a render error instead
//! of silently passing through.

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase, ToTitleCase};

use crate::fixtures;
use crate::relations::{resolve_relations, RelationPlan};
use forge_core::{naming, DeleteBehavior, EngineError, EngineResult};
use forge_ir::{Microservice, Model};

/// Inline token prefix: `@gen{NAME}`
const INLINE_PREFIX: &str = "@gen{";

/// Line token prefix: `// @gen:NAME`
const LINE_PREFIX: &str = "// @gen:";

// ============================================================================
// Placeholder Keys
// ============================================================================

/// Every token templates may reference. Closed set: adding a template token
/// means adding a variant here and a value in [`PlaceholderMap::for_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKey {
    /// Model name, camelCase (`bankAccount`)
    ModelCamel,
    /// Model name, PascalCase (`BankAccount`)
    ModelPascal,
    /// Model name, snake_case (`bank_account`)
    ModelSnake,
    /// Model name, kebab-case (`bank-account`)
    ModelKebab,
    /// Model name, Title Case (`Bank Account`)
    ModelTitle,
    /// Plural model name, camelCase (`bankAccounts`)
    ModelCamelPlural,
    /// Plural model name, PascalCase (`BankAccounts`)
    ModelPascalPlural,
    /// Plural model name, snake_case (`bank_accounts`)
    ModelSnakePlural,
    /// Plural model name, kebab-case (`bank-accounts`)
    ModelKebabPlural,
    /// Owning microservice name
    MicroserviceName,
    /// Query include clauses from the relation resolver
    IncludeClauses,
    /// Quoted names of string-like fields, for text search
    SearchFields,
    /// Quoted names of the remaining fields, for exact filtering
    FilterFields,
    /// Cascade-delete statements for child models
    CascadeDeletes,
    /// Restrict pre-delete checks for child models
    RestrictChecks,
    /// Schema declaration lines for every field
    SchemaFields,
    /// Factory default lines for required fields
    FactoryDefaults,
    /// Post-create assertions for required fields
    RequiredAsserts,
    /// One-line sample create payload
    SamplePayload,
    /// App-level route registration statement
    RouteWiring,
}

impl PlaceholderKey {
    /// Token name as written in templates
    pub fn token(&self) -> &'static str {
        match self {
            Self::ModelCamel => "MODEL_CAMEL",
            Self::ModelPascal => "MODEL_PASCAL",
            Self::ModelSnake => "MODEL_SNAKE",
            Self::ModelKebab => "MODEL_KEBAB",
            Self::ModelTitle => "MODEL_TITLE",
            Self::ModelCamelPlural => "MODEL_CAMEL_PLURAL",
            Self::ModelPascalPlural => "MODEL_PASCAL_PLURAL",
            Self::ModelSnakePlural => "MODEL_SNAKE_PLURAL",
            Self::ModelKebabPlural => "MODEL_KEBAB_PLURAL",
            Self::MicroserviceName => "MICROSERVICE_NAME",
            Self::IncludeClauses => "INCLUDE_CLAUSES",
            Self::SearchFields => "SEARCH_FIELDS",
            Self::FilterFields => "FILTER_FIELDS",
            Self::CascadeDeletes => "CASCADE_DELETES",
            Self::RestrictChecks => "RESTRICT_CHECKS",
            Self::SchemaFields => "SCHEMA_FIELDS",
            Self::FactoryDefaults => "FACTORY_DEFAULTS",
            Self::RequiredAsserts => "REQUIRED_ASSERTS",
            Self::SamplePayload => "SAMPLE_PAYLOAD",
            Self::RouteWiring => "ROUTE_WIRING",
        }
    }

    /// Parse a token name back into a key
    pub fn from_token(token: &str) -> Option<Self> {
        Self::all().into_iter().find(|key| key.token() == token)
    }

    /// All keys in declaration order
    pub fn all() -> Vec<Self> {
        vec![
            Self::ModelCamel,
            Self::ModelPascal,
            Self::ModelSnake,
            Self::ModelKebab,
            Self::ModelTitle,
            Self::ModelCamelPlural,
            Self::ModelPascalPlural,
            Self::ModelSnakePlural,
            Self::ModelKebabPlural,
            Self::MicroserviceName,
            Self::IncludeClauses,
            Self::SearchFields,
            Self::FilterFields,
            Self::CascadeDeletes,
            Self::RestrictChecks,
            Self::SchemaFields,
            Self::FactoryDefaults,
            Self::RequiredAsserts,
            Self::SamplePayload,
            Self::RouteWiring,
        ]
    }
}

// ============================================================================
// Placeholder Map
// ============================================================================

/// Values for every placeholder key, built once per model.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMap {
    values: HashMap<PlaceholderKey, String>,
}

impl PlaceholderMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, builder-style
    pub fn with(mut self, key: PlaceholderKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Look up a value
    pub fn get(&self, key: PlaceholderKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Build the full placeholder set for one model.
    ///
    /// Covers every key in [`PlaceholderKey::all`]; rendering any template
    /// against the result can only fail on tokens outside the closed set.
    pub fn for_model(model: &Model, microservice: &Microservice) -> Self {
        let plan = resolve_relations(model, microservice);
        let plural = naming::pluralize(&model.name);

        let mut map = Self::new()
            .with(PlaceholderKey::ModelCamel, model.name.to_lower_camel_case())
            .with(PlaceholderKey::ModelPascal, model.name.to_pascal_case())
            .with(PlaceholderKey::ModelSnake, model.name.to_snake_case())
            .with(PlaceholderKey::ModelKebab, model.name.to_kebab_case())
            .with(PlaceholderKey::ModelTitle, model.name.to_title_case())
            .with(PlaceholderKey::ModelCamelPlural, plural.to_lower_camel_case())
            .with(PlaceholderKey::ModelPascalPlural, plural.to_pascal_case())
            .with(PlaceholderKey::ModelSnakePlural, plural.to_snake_case())
            .with(PlaceholderKey::ModelKebabPlural, plural.to_kebab_case())
            .with(PlaceholderKey::MicroserviceName, microservice.name.clone())
            .with(PlaceholderKey::IncludeClauses, plan.render_includes());

        map = map
            .with(PlaceholderKey::SearchFields, search_fields(model))
            .with(PlaceholderKey::FilterFields, filter_fields(model))
            .with(
                PlaceholderKey::CascadeDeletes,
                delete_fragments(model, microservice, DeleteBehavior::Cascade),
            )
            .with(
                PlaceholderKey::RestrictChecks,
                delete_fragments(model, microservice, DeleteBehavior::Restrict),
            )
            .with(PlaceholderKey::SchemaFields, schema_fields(model))
            .with(
                PlaceholderKey::FactoryDefaults,
                factory_defaults(model, microservice),
            )
            .with(PlaceholderKey::RequiredAsserts, required_asserts(model))
            .with(
                PlaceholderKey::SamplePayload,
                sample_payload(model, microservice),
            )
            .with(PlaceholderKey::RouteWiring, route_wiring(model));

        map
    }

    /// The relation plan used for this model's includes
    pub fn relation_plan(model: &Model, microservice: &Microservice) -> RelationPlan {
        resolve_relations(model, microservice)
    }
}

// ============================================================================
// Fragment Builders
// ============================================================================

fn domain_fields(model: &Model) -> impl Iterator<Item = &forge_ir::FieldDefn> {
    model.field_defns.iter().filter(|f| !f.is_primary_key())
}

/// Quoted search field names: string-like data types
fn search_fields(model: &Model) -> String {
    let names: Vec<String> = domain_fields(model)
        .filter(|f| f.data_type.is_string_like())
        .map(|f| format!("\"{}\"", f.name))
        .collect();
    names.join(", ")
}

/// Quoted filter field names: everything that is not search
fn filter_fields(model: &Model) -> String {
    let names: Vec<String> = domain_fields(model)
        .filter(|f| !f.data_type.is_string_like())
        .map(|f| format!("\"{}\"", f.name))
        .collect();
    names.join(", ")
}

/// Delete-behavior statements for every child model pointing at this one.
///
/// One statement per (child, FK) pair; an empty result means the template
/// section renders empty, so restrict checks only appear when restrict
/// children exist.
fn delete_fragments(
    model: &Model,
    microservice: &Microservice,
    behavior: DeleteBehavior,
) -> String {
    let mut statements = Vec::new();
    for child in &microservice.models {
        for field in &child.field_defns {
            if !field.is_internal_fk() || field.foreign_key_model_id != Some(model.id) {
                continue;
            }
            let field_behavior = field.on_delete.unwrap_or(DeleteBehavior::Restrict);
            if field_behavior != behavior {
                continue;
            }
            let child_camel = naming::pluralize(&child.name).to_lower_camel_case();
            let statement = match behavior {
                DeleteBehavior::Cascade => {
                    format!("await deleteChildren(\"{}\", \"{}\", id);", child_camel, field.name)
                }
                DeleteBehavior::Restrict => {
                    format!(
                        "await assertNoChildren(\"{}\", \"{}\", id);",
                        child_camel, field.name
                    )
                }
            };
            statements.push(statement);
        }
    }
    statements.join("\n")
}

/// Schema declaration lines for every domain field
fn schema_fields(model: &Model) -> String {
    let lines: Vec<String> = domain_fields(model).map(fixtures::schema_declaration).collect();
    lines.join("\n")
}

fn required_domain_fields(model: &Model) -> impl Iterator<Item = &forge_ir::FieldDefn> {
    domain_fields(model).filter(|f| !f.is_optional)
}

/// Factory default lines for required fields
fn factory_defaults(model: &Model, microservice: &Microservice) -> String {
    let lines: Vec<String> = required_domain_fields(model)
        .map(|f| {
            let enum_defn = f.enum_defn_id.and_then(|id| microservice.enum_by_id(id));
            format!("{},", fixtures::factory_default(f, enum_defn))
        })
        .collect();
    lines.join("\n")
}

/// Post-create assertion lines for required fields
fn required_asserts(model: &Model) -> String {
    let lines: Vec<String> = required_domain_fields(model)
        .map(fixtures::required_assert)
        .collect();
    lines.join("\n")
}

/// One-line sample create payload for required fields
fn sample_payload(model: &Model, microservice: &Microservice) -> String {
    let entries: Vec<String> = required_domain_fields(model)
        .map(|f| {
            let enum_defn = f.enum_defn_id.and_then(|id| microservice.enum_by_id(id));
            fixtures::factory_default(f, enum_defn)
        })
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

/// App-level route registration statement for this model
fn route_wiring(model: &Model) -> String {
    format!(
        "registerRoutes(app, \"{}\", {}Controller);",
        naming::pluralize(&model.name).to_kebab_case(),
        model.name.to_pascal_case()
    )
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a template against a placeholder map.
///
/// Two token conventions are substituted uniformly:
/// - inline: `@gen{NAME}` anywhere in a line;
/// - line: a line whose content is `// @gen:NAME` is replaced wholesale by
///   the (possibly multi-line) value, re-indented to the token line's depth.
///
/// Any token outside the closed key set, or a key with no value in the map,
/// fails with [`EngineError::TemplateRender`].
pub fn render(template_name: &str, template: &str, map: &PlaceholderMap) -> EngineResult<String> {
    let mut out = String::with_capacity(template.len());

    for line in template.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(LINE_PREFIX) {
            let token = rest.trim();
            let value = lookup(template_name, token, map)?;
            // An empty value drops the token line entirely, no stray blank
            // line in the output
            if value.is_empty() {
                continue;
            }
            let indent = &line[..line.len() - trimmed.len()];
            let mut first = true;
            for value_line in value.lines() {
                if !first {
                    out.push('\n');
                }
                first = false;
                if value_line.is_empty() {
                    continue;
                }
                out.push_str(indent);
                out.push_str(value_line);
            }
            out.push('\n');
        } else {
            out.push_str(&render_inline(template_name, line, map)?);
            out.push('\n');
        }
    }

    Ok(out)
}

fn render_inline(template_name: &str, line: &str, map: &PlaceholderMap) -> EngineResult<String> {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find(INLINE_PREFIX) {
        out.push_str(&rest[..start]);
        let after = &rest[start + INLINE_PREFIX.len()..];
        let Some(end) = after.find('}') else {
            return Err(EngineError::TemplateRender {
                template: template_name.to_string(),
                message: format!("unterminated inline token in line: {}", line.trim()),
            });
        };
        let token = &after[..end];
        out.push_str(lookup(template_name, token, map)?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn lookup<'a>(
    template_name: &str,
    token: &str,
    map: &'a PlaceholderMap,
) -> EngineResult<&'a str> {
    let key = PlaceholderKey::from_token(token).ok_or_else(|| EngineError::TemplateRender {
        template: template_name.to_string(),
        message: format!("unknown placeholder token '{}'", token),
    })?;
    map.get(key).ok_or_else(|| EngineError::TemplateRender {
        template: template_name.to_string(),
        message: format!("no value bound for placeholder '{}'", token),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::DataType;
    use forge_ir::FieldDefn;

    fn sample_model() -> (Model, Microservice) {
        let model = Model::new("Bank Account")
            .with_field(FieldDefn::new("label", DataType::String))
            .with_field(FieldDefn::new("balance", DataType::Decimal))
            .with_field(FieldDefn::new("notes", DataType::Text).optional());
        let ms = Microservice::new("billing", "Billing").with_model(model.clone());
        (model, ms)
    }

    #[test]
    fn test_token_round_trip() {
        for key in PlaceholderKey::all() {
            assert_eq!(PlaceholderKey::from_token(key.token()), Some(key));
        }
        assert_eq!(PlaceholderKey::from_token("NOT_A_TOKEN"), None);
    }

    #[test]
    fn test_for_model_covers_every_key() {
        let (model, ms) = sample_model();
        let map = PlaceholderMap::for_model(&model, &ms);
        for key in PlaceholderKey::all() {
            assert!(map.get(key).is_some(), "no value for {:?}", key);
        }
    }

    #[test]
    fn test_naming_forms() {
        let (model, ms) = sample_model();
        let map = PlaceholderMap::for_model(&model, &ms);

        assert_eq!(map.get(PlaceholderKey::ModelCamel), Some("bankAccount"));
        assert_eq!(map.get(PlaceholderKey::ModelPascal), Some("BankAccount"));
        assert_eq!(map.get(PlaceholderKey::ModelSnake), Some("bank_account"));
        assert_eq!(map.get(PlaceholderKey::ModelKebab), Some("bank-account"));
        assert_eq!(map.get(PlaceholderKey::ModelTitle), Some("Bank Account"));
        assert_eq!(
            map.get(PlaceholderKey::ModelKebabPlural),
            Some("bank-accounts")
        );
    }

    #[test]
    fn test_search_and_filter_classification() {
        let (model, ms) = sample_model();
        let map = PlaceholderMap::for_model(&model, &ms);

        assert_eq!(
            map.get(PlaceholderKey::SearchFields),
            Some("\"label\", \"notes\"")
        );
        assert_eq!(map.get(PlaceholderKey::FilterFields), Some("\"balance\""));
    }

    #[test]
    fn test_inline_substitution() {
        let (model, ms) = sample_model();
        let map = PlaceholderMap::for_model(&model, &ms);

        let out = render(
            "controller",
            "export class @gen{MODEL_PASCAL}Controller {}",
            &map,
        )
        .unwrap();
        assert_eq!(out, "export class BankAccountController {}\n");
    }

    #[test]
    fn test_line_substitution_preserves_indent() {
        let map = PlaceholderMap::new().with(
            PlaceholderKey::RequiredAsserts,
            "assertDefined(created.label);\nassertDefined(created.balance);",
        );

        let template = "function check() {\n    // @gen:REQUIRED_ASSERTS\n}";
        let out = render("test", template, &map).unwrap();
        assert_eq!(
            out,
            "function check() {\n    assertDefined(created.label);\n    assertDefined(created.balance);\n}\n"
        );
    }

    #[test]
    fn test_empty_line_value_drops_the_line() {
        let map = PlaceholderMap::new().with(PlaceholderKey::RestrictChecks, "");

        let template = "async remove(id) {\n    // @gen:RESTRICT_CHECKS\n    return del(id);\n}";
        let out = render("controller", template, &map).unwrap();
        assert_eq!(out, "async remove(id) {\n    return del(id);\n}\n");
    }

    #[test]
    fn test_unknown_token_is_an_error() {
        let map = PlaceholderMap::new();
        let err = render("controller", "x = @gen{BOGUS_TOKEN};", &map).unwrap_err();
        match err {
            EngineError::TemplateRender { template, message } => {
                assert_eq!(template, "controller");
                assert!(message.contains("BOGUS_TOKEN"));
            }
            other => panic!("expected TemplateRender, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_token_is_an_error() {
        let map = PlaceholderMap::new();
        let err = render("controller", "x = @gen{MODEL_CAMEL;", &map).unwrap_err();
        assert!(matches!(err, EngineError::TemplateRender { .. }));
    }

    #[test]
    fn test_delete_fragments() {
        // Parent with one cascade child and one restrict child
        let parent = Model::new("Client").with_field(FieldDefn::new("name", DataType::String));

        let order_fk = FieldDefn::new("client", DataType::Uuid)
            .internal_fk(parent.id)
            .on_delete(DeleteBehavior::Cascade);
        let order = Model::new("Order").with_field(order_fk);

        let invoice_fk = FieldDefn::new("client", DataType::Uuid)
            .internal_fk(parent.id)
            .on_delete(DeleteBehavior::Restrict);
        let invoice = Model::new("Invoice").with_field(invoice_fk);

        let ms = Microservice::new("billing", "Billing")
            .with_model(parent.clone())
            .with_model(order)
            .with_model(invoice);

        let map = PlaceholderMap::for_model(&parent, &ms);
        assert_eq!(
            map.get(PlaceholderKey::CascadeDeletes),
            Some("await deleteChildren(\"orders\", \"client\", id);")
        );
        assert_eq!(
            map.get(PlaceholderKey::RestrictChecks),
            Some("await assertNoChildren(\"invoices\", \"client\", id);")
        );
    }

    #[test]
    fn test_no_children_renders_empty() {
        let (model, ms) = sample_model();
        let map = PlaceholderMap::for_model(&model, &ms);
        assert_eq!(map.get(PlaceholderKey::CascadeDeletes), Some(""));
        assert_eq!(map.get(PlaceholderKey::RestrictChecks), Some(""));
    }

    #[test]
    fn test_sample_payload() {
        let (model, ms) = sample_model();
        let map = PlaceholderMap::for_model(&model, &ms);
        assert_eq!(
            map.get(PlaceholderKey::SamplePayload),
            Some("{ label: \"forgefix-string\", balance: \"42.42\" }")
        );
    }

    #[test]
    fn test_route_wiring() {
        let (model, ms) = sample_model();
        let map = PlaceholderMap::for_model(&model, &ms);
        assert_eq!(
            map.get(PlaceholderKey::RouteWiring),
            Some("registerRoutes(app, \"bank-accounts\", BankAccountController);")
        );
    }
}
