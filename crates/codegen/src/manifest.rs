//! Migration manifest tracking
//!
//! Every generation run records what it produced: a checksum per model, a
//! schema-wide checksum, and the auto-fixes that were applied along the way.
//! Operators use the manifest to tell whether the schema on disk matches
//! what production has applied. Three rules govern it:
//!
//! - checksums are order-independent: permuting fields or models never
//!   changes a digest, only shape changes do;
//! - updates merge, never destroy: applied fixes accumulate and the
//!   production state survives regeneration;
//! - writes are atomic and sandboxed: a temp file in the target directory is
//!   persisted over the manifest, and the target must canonicalize inside an
//!   allow-listed root.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use forge_core::{DataType, EngineError, EngineResult, MicroserviceId};
use forge_ir::{AutoFix, FieldDefn, Microservice, Model};

/// Current manifest format version
pub const MANIFEST_VERSION: u32 = 1;

/// Default manifest file name
pub const MANIFEST_FILE_NAME: &str = "migration-manifest.json";

// ============================================================================
// Manifest Types
// ============================================================================

/// Stamp describing the most recent generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStamp {
    /// When the run happened
    pub generated_at: DateTime<Utc>,

    /// Checksum over every model checksum
    pub schema_checksum: String,

    /// Who triggered the run
    pub generated_by: String,
}

/// The persisted shape of one field, the unit of checksum sensitivity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldShape {
    pub data_type: DataType,
    pub is_optional: bool,
    pub is_foreign_key: bool,
}

impl FieldShape {
    fn of(field: &FieldDefn) -> Self {
        Self {
            data_type: field.data_type,
            is_optional: field.is_optional,
            is_foreign_key: field.is_foreign_key,
        }
    }
}

/// One model's entry in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    /// `sha256:<hex>` digest of the model's field shapes
    pub checksum: String,

    /// Field shapes keyed by field name
    pub fields: BTreeMap<String, FieldShape>,
}

/// An auto-fix recorded against the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFix {
    /// Human-readable summary of the fix
    pub description: String,

    /// When it was applied
    pub applied_at: DateTime<Utc>,
}

/// State of the schema as applied to production
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionState {
    /// Name of the last migration marked as applied
    pub last_applied_migration: String,

    /// When it was marked
    pub marked_at: DateTime<Utc>,

    /// Who marked it
    pub marked_by: String,
}

/// The full migration manifest for one microservice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationManifest {
    /// Manifest format version
    pub version: u32,

    pub microservice_id: MicroserviceId,
    pub microservice_name: String,

    /// Most recent generation run
    pub current_generation: GenerationStamp,

    /// Model entries keyed by model name
    pub models: BTreeMap<String, ModelEntry>,

    /// Every auto-fix ever applied, strictly accumulating
    pub auto_fixes_applied: Vec<AppliedFix>,

    /// Production marker, absent until the first `mark_applied`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_state: Option<ProductionState>,
}

impl MigrationManifest {
    /// Build a fresh manifest for a microservice
    pub fn for_microservice(microservice: &Microservice, generated_by: impl Into<String>) -> Self {
        let models = model_entries(&microservice.models);
        Self {
            version: MANIFEST_VERSION,
            microservice_id: microservice.id,
            microservice_name: microservice.name.clone(),
            current_generation: GenerationStamp {
                generated_at: Utc::now(),
                schema_checksum: schema_checksum(&microservice.models),
                generated_by: generated_by.into(),
            },
            models,
            auto_fixes_applied: Vec::new(),
            production_state: None,
        }
    }

    /// Whether the stored schema checksum matches the given models
    pub fn matches(&self, models: &[Model]) -> bool {
        self.current_generation.schema_checksum == schema_checksum(models)
    }
}

fn model_entries(models: &[Model]) -> BTreeMap<String, ModelEntry> {
    models
        .iter()
        .map(|model| {
            let fields: BTreeMap<String, FieldShape> = model
                .field_defns
                .iter()
                .map(|f| (f.name.clone(), FieldShape::of(f)))
                .collect();
            (
                model.name.clone(),
                ModelEntry {
                    checksum: model_checksum(model),
                    fields,
                },
            )
        })
        .collect()
}

// ============================================================================
// Checksums
// ============================================================================

/// Checksum over a model's field shapes, rendered `sha256:<hex>`.
///
/// Fields are sorted by name before hashing, so field order in the model
/// never affects the digest.
pub fn model_checksum(model: &Model) -> String {
    let mut lines: Vec<String> = model
        .field_defns
        .iter()
        .map(|f| {
            format!(
                "{}|{}|{}|{}",
                f.name, f.data_type, f.is_optional, f.is_foreign_key
            )
        })
        .collect();
    lines.sort();
    digest(lines.join("\n").as_bytes())
}

/// Checksum over every model checksum, rendered `sha256:<hex>`.
///
/// Model checksums are sorted before hashing, so model order never affects
/// the digest either.
pub fn schema_checksum(models: &[Model]) -> String {
    let mut checksums: Vec<String> = models.iter().map(model_checksum).collect();
    checksums.sort();
    digest(checksums.join("\n").as_bytes())
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

// ============================================================================
// Tracker
// ============================================================================

/// Reads and writes manifests within a sandboxed output root.
#[derive(Debug, Clone)]
pub struct ManifestTracker {
    /// Directory manifest paths must resolve under (the system temp
    /// directory is always allowed as well)
    sandbox_root: PathBuf,
}

impl ManifestTracker {
    /// Create a tracker allowing writes under `sandbox_root`
    pub fn new(sandbox_root: impl Into<PathBuf>) -> Self {
        Self {
            sandbox_root: sandbox_root.into(),
        }
    }

    /// Load a manifest.
    ///
    /// An absent file is `Ok(None)`; an unparsable file is
    /// [`EngineError::ManifestCorrupt`]; a version other than
    /// [`MANIFEST_VERSION`] is [`EngineError::ManifestVersionMismatch`] —
    /// there is no silent migration of manifest formats.
    pub fn load(&self, path: impl AsRef<Path>) -> EngineResult<Option<MigrationManifest>> {
        let path = self.sandboxed(path.as_ref())?;
        if !path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&path)?;
        let manifest: MigrationManifest =
            serde_json::from_str(&json).map_err(|e| EngineError::ManifestCorrupt {
                path: path.clone(),
                message: e.to_string(),
            })?;

        if manifest.version != MANIFEST_VERSION {
            return Err(EngineError::ManifestVersionMismatch {
                expected: MANIFEST_VERSION,
                found: manifest.version,
            });
        }
        Ok(Some(manifest))
    }

    /// Record a generation run: create the manifest or merge into it.
    ///
    /// Checksums and the generation stamp are refreshed; previously applied
    /// fixes and the production state are preserved; the new fixes are
    /// appended.
    pub fn update(
        &self,
        path: impl AsRef<Path>,
        microservice: &Microservice,
        generated_by: &str,
        applied_fixes: &[AutoFix],
    ) -> EngineResult<MigrationManifest> {
        let path = path.as_ref();
        let mut manifest = match self.load(path)? {
            Some(existing) => existing,
            None => MigrationManifest::for_microservice(microservice, generated_by),
        };

        manifest.microservice_id = microservice.id;
        manifest.microservice_name = microservice.name.clone();
        manifest.models = model_entries(&microservice.models);
        manifest.current_generation = GenerationStamp {
            generated_at: Utc::now(),
            schema_checksum: schema_checksum(&microservice.models),
            generated_by: generated_by.to_string(),
        };

        let now = Utc::now();
        manifest
            .auto_fixes_applied
            .extend(applied_fixes.iter().map(|fix| AppliedFix {
                description: fix.describe(),
                applied_at: now,
            }));

        self.save(path, &manifest)?;
        info!(
            microservice = %manifest.microservice_name,
            models = manifest.models.len(),
            fixes = applied_fixes.len(),
            "migration manifest updated"
        );
        Ok(manifest)
    }

    /// Mark a migration as applied to production
    pub fn mark_applied(
        &self,
        path: impl AsRef<Path>,
        migration_name: &str,
        marked_by: &str,
    ) -> EngineResult<MigrationManifest> {
        let path = path.as_ref();
        let mut manifest = self.load(path)?.ok_or_else(|| {
            EngineError::ManifestCorrupt {
                path: path.to_path_buf(),
                message: "cannot mark a migration applied without a manifest".to_string(),
            }
        })?;

        manifest.production_state = Some(ProductionState {
            last_applied_migration: migration_name.to_string(),
            marked_at: Utc::now(),
            marked_by: marked_by.to_string(),
        });

        self.save(path, &manifest)?;
        Ok(manifest)
    }

    /// Atomically write a manifest: temp file in the target directory, then
    /// rename over the destination. Readers never observe a half-written
    /// manifest.
    fn save(&self, path: &Path, manifest: &MigrationManifest) -> EngineResult<()> {
        let path = self.sandboxed(path)?;
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&parent).map_err(|e| EngineError::DirectoryCreate {
            path: parent.clone(),
            message: e.to_string(),
        })?;

        let json = serde_json::to_string_pretty(manifest)?;
        let temp = tempfile::NamedTempFile::new_in(&parent)?;
        std::fs::write(temp.path(), json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o600))?;
        }

        temp.persist(&path).map_err(|e| EngineError::FileWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Resolve a manifest path against the sandbox.
    ///
    /// The deepest existing ancestor is canonicalized and must fall under
    /// the sandbox root or the system temp directory; `..` components are
    /// rejected outright. This boundary is what keeps a hostile model name
    /// or config value from steering writes outside the output tree.
    fn sandboxed(&self, path: &Path) -> EngineResult<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        if absolute
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(EngineError::PathOutsideSandbox(absolute));
        }

        // Canonicalize as much of the path as already exists
        let mut existing = absolute.as_path();
        let mut remainder = Vec::new();
        while !existing.exists() {
            let Some(parent) = existing.parent() else {
                return Err(EngineError::PathOutsideSandbox(absolute));
            };
            if let Some(name) = existing.file_name() {
                remainder.push(name.to_os_string());
            }
            existing = parent;
        }
        let mut resolved = existing.canonicalize()?;
        for part in remainder.iter().rev() {
            resolved.push(part);
        }

        let allowed = [
            self.sandbox_root.canonicalize().unwrap_or_else(|_| self.sandbox_root.clone()),
            std::env::temp_dir()
                .canonicalize()
                .unwrap_or_else(|_| std::env::temp_dir()),
        ];
        if allowed.iter().any(|root| resolved.starts_with(root)) {
            Ok(resolved)
        } else {
            Err(EngineError::PathOutsideSandbox(absolute))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::ForeignKeyTarget;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn sample_microservice() -> Microservice {
        let invoice = Model::new("Invoice")
            .with_field(FieldDefn::new("number", DataType::String))
            .with_field(FieldDefn::new("total", DataType::Decimal));
        let client = Model::new("Client").with_field(FieldDefn::new("name", DataType::String));
        Microservice::new("billing", "Billing")
            .with_model(invoice)
            .with_model(client)
    }

    fn tracker(dir: &TempDir) -> ManifestTracker {
        ManifestTracker::new(dir.path())
    }

    #[test]
    fn test_model_checksum_ignores_field_order() {
        let ms = sample_microservice();
        let invoice = &ms.models[0];

        let mut reordered = invoice.clone();
        reordered.field_defns.reverse();

        assert_eq!(model_checksum(invoice), model_checksum(&reordered));
        assert!(model_checksum(invoice).starts_with("sha256:"));
    }

    #[test]
    fn test_schema_checksum_ignores_model_order() {
        let ms = sample_microservice();
        let mut reordered = ms.models.clone();
        reordered.reverse();

        assert_eq!(schema_checksum(&ms.models), schema_checksum(&reordered));
    }

    #[test]
    fn test_checksum_changes_with_shape() {
        let ms = sample_microservice();
        let invoice = &ms.models[0];
        let base = model_checksum(invoice);

        // Optionality flip changes the digest
        let mut changed = invoice.clone();
        changed.field_defns[1].is_optional = true;
        assert_ne!(base, model_checksum(&changed));

        // Data type change changes the digest
        let mut changed = invoice.clone();
        changed.field_defns[1].data_type = DataType::Int;
        assert_ne!(base, model_checksum(&changed));

        // Rename changes the digest
        let mut changed = invoice.clone();
        changed.field_defns[1].name = "amount".to_string();
        assert_ne!(base, model_checksum(&changed));

        // Flipping the foreign-key flag alone changes the digest
        let mut changed = invoice.clone();
        let target = changed.id;
        changed.field_defns[1].is_foreign_key = true;
        changed.field_defns[1].foreign_key_target = Some(ForeignKeyTarget::Internal);
        changed.field_defns[1].foreign_key_model_id = Some(target);
        let fk_digest = model_checksum(&changed);
        assert_ne!(base, fk_digest);

        // The hashed shape is name|type|optional|fk: retargeting the key from
        // internal to external leaves the digest alone
        let mut retargeted = changed.clone();
        retargeted.field_defns[1].foreign_key_target = Some(ForeignKeyTarget::External);
        retargeted.field_defns[1].foreign_key_model_id = None;
        retargeted.field_defns[1].external_model_id = Some(Uuid::new_v4());
        retargeted.field_defns[1].external_microservice_id = Some(Uuid::new_v4());
        assert_eq!(fk_digest, model_checksum(&retargeted));
    }

    #[test]
    fn test_load_absent_manifest_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = tracker(&dir).load(dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_update_creates_then_merges() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let path = dir.path().join(MANIFEST_FILE_NAME);
        let ms = sample_microservice();

        let first = tracker.update(&path, &ms, "alice", &[]).unwrap();
        assert_eq!(first.version, MANIFEST_VERSION);
        assert_eq!(first.models.len(), 2);
        assert!(first.matches(&ms.models));

        // Second run with a fix appends without losing anything
        let fix = AutoFix::RenameMicroservice {
            from: "Billing".to_string(),
            to: "billing".to_string(),
        };
        let second = tracker.update(&path, &ms, "bob", &[fix]).unwrap();
        assert_eq!(second.auto_fixes_applied.len(), 1);
        assert_eq!(second.current_generation.generated_by, "bob");

        let third = tracker.update(&path, &ms, "carol", &[]).unwrap();
        // Fixes accumulate, they are never cleared by later runs
        assert_eq!(third.auto_fixes_applied.len(), 1);
    }

    #[test]
    fn test_mark_applied_survives_regeneration() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let path = dir.path().join(MANIFEST_FILE_NAME);
        let ms = sample_microservice();

        tracker.update(&path, &ms, "alice", &[]).unwrap();
        tracker.mark_applied(&path, "0002_add_client", "ops").unwrap();

        let after = tracker.update(&path, &ms, "alice", &[]).unwrap();
        let state = after.production_state.expect("production state kept");
        assert_eq!(state.last_applied_migration, "0002_add_client");
        assert_eq!(state.marked_by, "ops");
    }

    #[test]
    fn test_mark_applied_requires_manifest() {
        let dir = TempDir::new().unwrap();
        let err = tracker(&dir)
            .mark_applied(dir.path().join("missing.json"), "0001_init", "ops")
            .unwrap_err();
        assert!(err.is_migration_issue());
    }

    #[test]
    fn test_corrupt_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let err = tracker(&dir).load(&path).unwrap_err();
        assert!(matches!(err, EngineError::ManifestCorrupt { .. }));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let path = dir.path().join(MANIFEST_FILE_NAME);
        let ms = sample_microservice();

        tracker.update(&path, &ms, "alice", &[]).unwrap();

        // Bump the stored version out from under the tracker
        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        value["version"] = serde_json::json!(MANIFEST_VERSION + 1);
        std::fs::write(&path, value.to_string()).unwrap();

        let err = tracker.load(&path).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ManifestVersionMismatch { found, .. } if found == MANIFEST_VERSION + 1
        ));
    }

    #[test]
    fn test_sandbox_rejects_outside_paths() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);

        let err = tracker
            .update(
                "/definitely-not-allowed/manifest.json",
                &sample_microservice(),
                "alice",
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::PathOutsideSandbox(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_sandbox_rejects_parent_components() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let sneaky = dir.path().join("../escape/manifest.json");

        let err = tracker
            .update(&sneaky, &sample_microservice(), "alice", &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::PathOutsideSandbox(_)));
    }

    #[test]
    fn test_manifest_roundtrips_through_json() {
        let ms = sample_microservice();
        let manifest = MigrationManifest::for_microservice(&ms, "alice");

        let json = serde_json::to_string_pretty(&manifest).unwrap();
        let back: MigrationManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(manifest, back);
    }
}
