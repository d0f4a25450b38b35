//! Naming and format rules
//!
//! Pure functions that test strings against the engine's naming conventions
//! (domain labels, Start Case, camelCase, singular/plural, kebab slugs) plus
//! best-effort "suggest a valid name" transforms used in issue hints and by
//! the auto-fix applier.

use heck::{ToKebabCase, ToLowerCamelCase, ToTitleCase};

// ============================================================================
// Predicates
// ============================================================================

/// Check if a string is a valid domain label (microservice name).
///
/// Lowercase letters, digits, and single hyphens; must start with a letter
/// and must not end with a hyphen.
pub fn is_domain_label(s: &str) -> bool {
    if s.is_empty() || !s.starts_with(|c: char| c.is_ascii_lowercase()) {
        return false;
    }
    if s.ends_with('-') || s.contains("--") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Check if a string is in Start Case (e.g. "Bank Account").
///
/// Space-separated words, each beginning with an uppercase ASCII letter
/// followed by lowercase letters or digits.
pub fn is_start_case(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    s.split(' ').all(|word| {
        if !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if first.is_ascii_uppercase() => {
                chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            }
            _ => false,
        }
    })
}

/// Check if a string is camelCase (e.g. "bankAccount").
pub fn is_camel_case(s: &str) -> bool {
    if s.is_empty() || !s.starts_with(|c: char| c.is_ascii_lowercase()) {
        return false;
    }
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Check if a string is a valid kebab slug (e.g. "bank-account").
pub fn is_kebab_slug(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    s.split('-').all(|part| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}

/// Heuristic plural test for a model-name word.
///
/// A name counts as plural when its last word ends in `s` but not in the
/// `ss`/`us`/`is` endings that are singular in common domain vocabulary
/// ("Address", "Status", "Analysis").
pub fn is_plural(s: &str) -> bool {
    let last_word = s.rsplit(' ').next().unwrap_or(s);
    let lower = last_word.to_ascii_lowercase();
    lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
}

/// Heuristic singular test. Inverse of [`is_plural`].
pub fn is_singular(s: &str) -> bool {
    !is_plural(s)
}

// ============================================================================
// Suggestion Transforms
// ============================================================================

/// Suggest a valid domain label for an invalid microservice name.
pub fn suggest_domain_label(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let mut label = String::with_capacity(cleaned.len());
    for part in cleaned.split('-').filter(|p| !p.is_empty()) {
        if !label.is_empty() {
            label.push('-');
        }
        label.push_str(part);
    }
    // A label must start with a letter
    let label = label.trim_start_matches(|c: char| c.is_ascii_digit());
    label.trim_matches('-').to_string()
}

/// Suggest a Start Case form of a name (e.g. "bankAccount" → "Bank Account").
pub fn suggest_start_case(s: &str) -> String {
    s.to_title_case()
}

/// Suggest a camelCase form of a name (e.g. "Bank Account" → "bankAccount").
pub fn suggest_camel_case(s: &str) -> String {
    s.to_lower_camel_case()
}

/// Suggest a kebab slug form of a name (e.g. "Bank Account" → "bank-account").
pub fn suggest_kebab_slug(s: &str) -> String {
    s.to_kebab_case()
}

/// Best-effort singular form of a name's last word.
pub fn singularize(s: &str) -> String {
    if !is_plural(s) {
        return s.to_string();
    }
    let lower = s.to_ascii_lowercase();
    if lower.ends_with("ies") && s.len() > 3 {
        format!("{}y", &s[..s.len() - 3])
    } else if lower.ends_with("es") && (lower.ends_with("ches") || lower.ends_with("shes")) {
        s[..s.len() - 2].to_string()
    } else {
        s[..s.len() - 1].to_string()
    }
}

/// Best-effort plural form of a name's last word.
pub fn pluralize(s: &str) -> String {
    if is_plural(s) {
        return s.to_string();
    }
    let lower = s.to_ascii_lowercase();
    if lower.ends_with('y')
        && !lower.ends_with("ay")
        && !lower.ends_with("ey")
        && !lower.ends_with("oy")
        && !lower.ends_with("uy")
    {
        format!("{}ies", &s[..s.len() - 1])
    } else if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        format!("{}es", s)
    } else {
        format!("{}s", s)
    }
}

/// Strip a single trailing `Id` suffix from a camelCase field name.
///
/// Field names must not end in `Id` (the relation name convention owns that
/// suffix); this is also how template placeholders like `bankAccountId` map
/// to their relation name `bankAccount`.
pub fn strip_trailing_id(s: &str) -> &str {
    if s.len() > 2 && s.ends_with("Id") {
        &s[..s.len() - 2]
    } else {
        s
    }
}

/// Check whether a camelCase field name carries a trailing `Id` suffix.
///
/// The reserved primary-key field literally named `id` is exempt.
pub fn has_trailing_id(s: &str) -> bool {
    s != "id" && s.len() > 2 && s.ends_with("Id")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_domain_label() {
        assert!(is_domain_label("billing"));
        assert!(is_domain_label("billing-service"));
        assert!(is_domain_label("svc2"));

        assert!(!is_domain_label(""));
        assert!(!is_domain_label("Billing"));
        assert!(!is_domain_label("2billing"));
        assert!(!is_domain_label("billing-"));
        assert!(!is_domain_label("billing--svc"));
        assert!(!is_domain_label("billing service"));
    }

    #[test]
    fn test_is_start_case() {
        assert!(is_start_case("Invoice"));
        assert!(is_start_case("Bank Account"));
        assert!(is_start_case("Invoice 2"));

        assert!(!is_start_case(""));
        assert!(!is_start_case("invoice"));
        assert!(!is_start_case("bank Account"));
        assert!(!is_start_case("Bank  Account")); // double space
        assert!(!is_start_case("BankAccount"));
    }

    #[test]
    fn test_is_camel_case() {
        assert!(is_camel_case("number"));
        assert!(is_camel_case("bankAccount"));
        assert!(is_camel_case("line2"));

        assert!(!is_camel_case(""));
        assert!(!is_camel_case("BankAccount"));
        assert!(!is_camel_case("bank_account"));
        assert!(!is_camel_case("bank account"));
    }

    #[test]
    fn test_is_kebab_slug() {
        assert!(is_kebab_slug("invoice"));
        assert!(is_kebab_slug("bank-account"));
        assert!(is_kebab_slug("v2-invoice"));

        assert!(!is_kebab_slug(""));
        assert!(!is_kebab_slug("Bank-Account"));
        assert!(!is_kebab_slug("bank--account"));
        assert!(!is_kebab_slug("-account"));
    }

    #[test]
    fn test_singular_plural() {
        assert!(is_singular("Invoice"));
        assert!(is_singular("Address"));
        assert!(is_singular("Status"));
        assert!(is_singular("Analysis"));
        assert!(is_singular("Bank Account"));

        assert!(is_plural("Invoices"));
        assert!(is_plural("Bank Accounts"));
    }

    #[test]
    fn test_suggest_domain_label() {
        assert_eq!(suggest_domain_label("Billing Service"), "billing-service");
        assert_eq!(suggest_domain_label("billing_service"), "billing-service");
        assert_eq!(suggest_domain_label("2nd Billing!"), "nd-billing");
    }

    #[test]
    fn test_suggest_start_case() {
        assert_eq!(suggest_start_case("bankAccount"), "Bank Account");
        assert_eq!(suggest_start_case("invoice"), "Invoice");
        assert_eq!(suggest_start_case("bank account"), "Bank Account");
    }

    #[test]
    fn test_suggest_camel_case() {
        assert_eq!(suggest_camel_case("Bank Account"), "bankAccount");
        assert_eq!(suggest_camel_case("due_date"), "dueDate");
        assert_eq!(suggest_camel_case("Number"), "number");
    }

    #[test]
    fn test_suggest_kebab_slug() {
        assert_eq!(suggest_kebab_slug("Bank Account"), "bank-account");
        assert_eq!(suggest_kebab_slug("Invoice"), "invoice");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("Invoices"), "Invoice");
        assert_eq!(singularize("Categories"), "Category");
        assert_eq!(singularize("Invoice"), "Invoice");
        assert_eq!(singularize("Address"), "Address");
        assert_eq!(singularize("Branches"), "Branch");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Invoice"), "Invoices");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Branch"), "Branches");
        assert_eq!(pluralize("Status"), "Statuses");
        assert_eq!(pluralize("Invoices"), "Invoices");
    }

    #[test]
    fn test_trailing_id() {
        assert!(has_trailing_id("bankAccountId"));
        assert!(!has_trailing_id("id"));
        assert!(!has_trailing_id("bankAccount"));
        // "Id" alone is a degenerate name, not a suffix
        assert!(!has_trailing_id("Id"));

        assert_eq!(strip_trailing_id("bankAccountId"), "bankAccount");
        assert_eq!(strip_trailing_id("number"), "number");
    }
}
