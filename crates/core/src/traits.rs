//! Core traits for Schemaforge
//!
//! Small traits implemented across the model graph for consistent lookup
//! and display behavior.

// ============================================================================
// Identifiable Trait
// ============================================================================

/// Trait for types that have a unique identifier
pub trait Identifiable {
    /// Get the unique identifier
    fn id(&self) -> uuid::Uuid;

    /// Check if this matches another identifier
    fn matches_id(&self, id: uuid::Uuid) -> bool {
        self.id() == id
    }
}

// ============================================================================
// Named Trait
// ============================================================================

/// Trait for types that have a human-readable name
pub trait Named {
    /// Get the name
    fn name(&self) -> &str;

    /// Set the name
    fn set_name(&mut self, name: String);

    /// Check if the name matches (case-insensitive)
    fn name_matches(&self, other: &str) -> bool {
        self.name().eq_ignore_ascii_case(other)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct TestNamed {
        name: String,
    }

    impl Named for TestNamed {
        fn name(&self) -> &str {
            &self.name
        }

        fn set_name(&mut self, name: String) {
            self.name = name;
        }
    }

    #[test]
    fn test_named_matches() {
        let named = TestNamed {
            name: "Invoice".to_string(),
        };
        assert!(named.name_matches("invoice"));
        assert!(named.name_matches("INVOICE"));
        assert!(!named.name_matches("Receipt"));
    }
}
