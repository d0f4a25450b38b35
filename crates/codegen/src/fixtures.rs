//! Test-fixture sample values
//!
//! Every data type maps to one fixed, clearly tagged literal. Generated test
//! scaffolds are deterministic because these values never vary between runs;
//! the `forgefix` tag makes them easy to spot in seeded databases.

use forge_core::DataType;
use forge_ir::{EnumDefn, FieldDefn};

/// JSON literal used as the sample value for a data type.
///
/// String-like types come back quoted; numeric and boolean types come back
/// as bare literals. Enum samples use the definition's first value when one
/// is available.
pub fn sample_value(data_type: DataType, enum_defn: Option<&EnumDefn>) -> String {
    match data_type {
        DataType::String => "\"forgefix-string\"".to_string(),
        DataType::Text => "\"forgefix text block\"".to_string(),
        DataType::Slug => "\"forgefix-slug\"".to_string(),
        DataType::Email => "\"forgefix@example.com\"".to_string(),
        DataType::Url => "\"https://forgefix.example.com\"".to_string(),
        DataType::Phone => "\"+15555550100\"".to_string(),
        DataType::Ip => "\"192.0.2.10\"".to_string(),
        DataType::Int => "42".to_string(),
        DataType::Float => "4.2".to_string(),
        DataType::Decimal => "\"42.42\"".to_string(),
        DataType::Bool => "true".to_string(),
        DataType::Date => "\"2024-01-02\"".to_string(),
        DataType::DateTime => "\"2024-01-02T03:04:05Z\"".to_string(),
        DataType::Time => "\"03:04:05\"".to_string(),
        DataType::Uuid => "\"00000000-0000-0000-0000-000000000001\"".to_string(),
        DataType::Json => "{}".to_string(),
        DataType::StringArray => "[\"forgefix-string\"]".to_string(),
        DataType::IntArray => "[42]".to_string(),
        DataType::Enum => match enum_defn.and_then(EnumDefn::first_value) {
            Some(value) => format!("\"{}\"", value),
            None => "\"forgefix-enum\"".to_string(),
        },
        DataType::Upload => "\"forgefix-upload.bin\"".to_string(),
    }
}

/// Factory-default fragment for one field: `name: <sample>`
pub fn factory_default(field: &FieldDefn, enum_defn: Option<&EnumDefn>) -> String {
    format!(
        "{}: {}",
        field.name,
        sample_value(field.data_type, enum_defn)
    )
}

/// Required-field assertion fragment for one field
pub fn required_assert(field: &FieldDefn) -> String {
    format!("assertDefined(created.{});", field.name)
}

/// Schema declaration fragment for one field: name, type, and modifiers
pub fn schema_declaration(field: &FieldDefn) -> String {
    let mut decl = format!("{}: {}", field.name, field.data_type);
    if field.is_optional {
        decl.push_str(" optional");
    }
    if field.is_unique {
        decl.push_str(" unique");
    }
    if let (Some(min), Some(max)) = (field.min_length, field.max_length) {
        decl.push_str(&format!(" length({}..{})", min, max));
    } else if let Some(min) = field.min_length {
        decl.push_str(&format!(" length({}..)", min));
    } else if let Some(max) = field.max_length {
        decl.push_str(&format!(" length(..{})", max));
    }
    decl
}

// ============================================================================
// Tests
// ============================================================================
