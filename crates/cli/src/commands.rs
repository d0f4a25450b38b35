//! Command implementations
//!
//! Each command returns the process exit code: `0` clean, `1` validation
//! issues remain (or the schema is out of sync with the manifest). Hard
//! errors bubble up as [`EngineError`] and map to exit code `2` at the
//! entry point.

use std::path::{Path, PathBuf};

use colored::Colorize;
use tracing::info;

use forge_codegen::{summarize, Generator, GeneratorConfig, ManifestTracker, TemplateSet, MANIFEST_FILE_NAME};
use forge_core::{EngineError, EngineResult};
use forge_ir::{
    apply_auto_fixes, load_microservice, plan_fixes, save_microservice, validate, AutoFix,
    InMemoryStore, Menu, Microservice, ValidationReport,
};

use crate::{Cli, Commands};

/// Route a parsed command line to its implementation.
pub fn dispatch(cli: Cli) -> EngineResult<i32> {
    match cli.command {
        Commands::Validate { file, menus, json } => cmd_validate(&file, menus.as_deref(), json),
        Commands::Fix {
            file,
            menus,
            dry_run,
        } => cmd_fix(&file, menus.as_deref(), dry_run),
        Commands::Generate {
            file,
            out,
            menus,
            no_tests,
            overwrite,
            fix,
            force,
            generated_by,
        } => cmd_generate(GenerateArgs {
            file,
            out,
            menus,
            no_tests,
            overwrite,
            fix,
            force,
            generated_by,
        }),
        Commands::Status { file, out } => cmd_status(&file, &out),
        Commands::MarkApplied {
            out,
            migration,
            marked_by,
        } => cmd_mark_applied(&out, &migration, &marked_by),
    }
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(file: &Path, menus: Option<&Path>, json: bool) -> EngineResult<i32> {
    let microservice = load_microservice(file)?;
    let menus = load_menus(menus)?;
    let report = validate(&microservice, &menus);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit_code(&report));
    }

    print_report(&microservice, &report);
    Ok(exit_code(&report))
}

// ============================================================================
// fix
// ============================================================================

fn cmd_fix(file: &Path, menus: Option<&Path>, dry_run: bool) -> EngineResult<i32> {
    let microservice = load_microservice(file)?;
    let menus = load_menus(menus)?;
    let report = validate(&microservice, &menus);
    let plan = plan_fixes(&report, &microservice);

    if plan.is_empty() {
        if report.has_errors() {
            println!(
                "{} {} issue(s) found, none fixable automatically",
                "!".yellow().bold(),
                report.issue_count()
            );
            print!("{report}");
            return Ok(1);
        }
        println!("{} nothing to fix", "✓".green().bold());
        return Ok(0);
    }

    println!(
        "{} {} fix(es) planned:",
        if dry_run { "○" } else { "●" }.cyan().bold(),
        plan.fixes.len()
    );
    for fix in &plan.fixes {
        println!("  {} {}", "→".cyan(), fix.describe());
    }
    for skipped in &plan.skipped {
        println!("  {} {}", "skipped:".dimmed(), skipped.dimmed());
    }

    if dry_run {
        return Ok(exit_code(&report));
    }

    let (fixed, applied) = apply_plan(microservice, &plan)?;
    save_microservice(&fixed, file)?;
    println!(
        "{} applied {} fix(es), wrote {}",
        "✓".green().bold(),
        applied.len(),
        file.display()
    );

    // Report whatever the fixes could not repair
    let remaining = validate(&fixed, &menus);
    if remaining.has_errors() {
        println!(
            "{} {} issue(s) remain:",
            "!".yellow().bold(),
            remaining.issue_count()
        );
        print!("{remaining}");
    }
    Ok(exit_code(&remaining))
}

fn apply_plan(
    microservice: Microservice,
    plan: &forge_ir::FixPlan,
) -> EngineResult<(Microservice, Vec<AutoFix>)> {
    let mut store = InMemoryStore::new(microservice);
    let applied = apply_auto_fixes(&mut store, plan)?;
    Ok((store.into_inner(), applied))
}

// ============================================================================
// generate
// ============================================================================

struct GenerateArgs {
    file: PathBuf,
    out: PathBuf,
    menus: Option<PathBuf>,
    no_tests: bool,
    overwrite: bool,
    fix: bool,
    force: bool,
    generated_by: String,
}

fn cmd_generate(args: GenerateArgs) -> EngineResult<i32> {
    let mut microservice = load_microservice(&args.file)?;
    let menus = load_menus(args.menus.as_deref())?;

    let mut applied_fixes = Vec::new();
    if args.fix {
        let report = validate(&microservice, &menus);
        let plan = plan_fixes(&report, &microservice);
        if !plan.is_empty() {
            let (fixed, applied) = apply_plan(microservice, &plan)?;
            save_microservice(&fixed, &args.file)?;
            println!("{} applied {} fix(es)", "✓".green().bold(), applied.len());
            microservice = fixed;
            applied_fixes = applied;
        }
    }

    let report = validate(&microservice, &menus);
    if report.has_errors() && !args.force {
        print_report(&microservice, &report);
        println!(
            "{} refusing to generate from an invalid definition (use --force to override)",
            "✗".red().bold()
        );
        return Ok(1);
    }

    let mut config = GeneratorConfig::new().with_output_dir(&args.out);
    if args.no_tests {
        config = config.without_tests();
    }
    if args.overwrite {
        config = config.allow_overwrite();
    }

    let bundle = Generator::new(config).generate_to_dir(&microservice, &TemplateSet::standard())?;

    let tracker = ManifestTracker::new(&args.out);
    tracker.update(
        args.out.join(MANIFEST_FILE_NAME),
        &microservice,
        &args.generated_by,
        &applied_fixes,
    )?;

    let summary = summarize(&bundle);
    info!(files = summary.total_files, "generation finished");
    println!(
        "{} generated {} file(s) for '{}' into {}",
        "✓".green().bold(),
        summary.total_files,
        summary.microservice_name,
        args.out.display()
    );
    println!(
        "  {} controller(s), {} schema(s), {} route file(s), {} test(s)",
        summary.controllers, summary.schemas, summary.routes, summary.tests
    );
    for warning in &bundle.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    Ok(0)
}

// ============================================================================
// status
// ============================================================================

fn cmd_status(file: &Path, out: &Path) -> EngineResult<i32> {
    let microservice = load_microservice(file)?;
    let tracker = ManifestTracker::new(out);

    let Some(manifest) = tracker.load(out.join(MANIFEST_FILE_NAME))? else {
        println!(
            "{} no manifest under {} (never generated?)",
            "!".yellow().bold(),
            out.display()
        );
        return Ok(1);
    };

    println!(
        "manifest: '{}', last generated {} by {}",
        manifest.microservice_name,
        manifest.current_generation.generated_at,
        manifest.current_generation.generated_by
    );
    if let Some(state) = &manifest.production_state {
        println!(
            "production: '{}' marked {} by {}",
            state.last_applied_migration, state.marked_at, state.marked_by
        );
    } else {
        println!("production: {}", "never marked".dimmed());
    }
    if !manifest.auto_fixes_applied.is_empty() {
        println!("auto-fixes recorded: {}", manifest.auto_fixes_applied.len());
    }

    if manifest.matches(&microservice.models) {
        println!("{} schema matches the last generation", "✓".green().bold());
        Ok(0)
    } else {
        println!(
            "{} schema has changed since the last generation (regenerate)",
            "!".yellow().bold()
        );
        Ok(1)
    }
}

// ============================================================================
// mark-applied
// ============================================================================

fn cmd_mark_applied(out: &Path, migration: &str, marked_by: &str) -> EngineResult<i32> {
    let tracker = ManifestTracker::new(out);
    let manifest = tracker.mark_applied(out.join(MANIFEST_FILE_NAME), migration, marked_by)?;
    println!(
        "{} marked '{}' as applied for '{}'",
        "✓".green().bold(),
        migration,
        manifest.microservice_name
    );
    Ok(0)
}

// ============================================================================
// Helpers
// ============================================================================

fn load_menus(path: Option<&Path>) -> EngineResult<Vec<Menu>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| {
        EngineError::InvalidFileFormat(format!("menus file '{}': {}", path.display(), e))
    })
}

fn print_report(microservice: &Microservice, report: &ValidationReport) {
    if report.has_errors() {
        println!(
            "{} '{}': {} issue(s)",
            "✗".red().bold(),
            microservice.name,
            report.issue_count()
        );
        print!("{report}");
    } else {
        println!("{} '{}': no issues", "✓".green().bold(), microservice.name);
    }
}

fn exit_code(report: &ValidationReport) -> i32 {
    if report.has_errors() { 1 } else { 0 }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::DataType;
    use forge_ir::{FieldDefn, Model};
    use tempfile::TempDir;

    fn clean_microservice() -> Microservice {
        let number = FieldDefn::new("number", DataType::String).clickable(0);
        let number_id = number.id;
        let invoice = Model::new("Invoice")
            .with_field(number)
            .with_display_field(number_id);
        Microservice::new("billing", "Billing").with_model(invoice)
    }

    fn write_menus(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("menus.json");
        let menus = vec![Menu::new("Main")];
        std::fs::write(&path, serde_json::to_string(&menus).unwrap()).unwrap();
        path
    }

    fn write_definition(dir: &TempDir, microservice: &Microservice) -> PathBuf {
        let path = dir.path().join("service.json");
        save_microservice(microservice, &path).unwrap();
        path
    }

    #[test]
    fn test_validate_clean_exits_zero() {
        let dir = TempDir::new().unwrap();
        let file = write_definition(&dir, &clean_microservice());
        let menus = write_menus(&dir);

        let code = cmd_validate(&file, Some(&menus), false).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_validate_without_menus_exits_one() {
        let dir = TempDir::new().unwrap();
        let file = write_definition(&dir, &clean_microservice());

        // No menus file means no bound menus, which the validator flags
        let code = cmd_validate(&file, None, false).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_validate_missing_file_is_hard_error() {
        let err = cmd_validate(Path::new("/nonexistent/service.json"), None, false).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_fix_rewrites_definition() {
        let dir = TempDir::new().unwrap();
        let mut ms = clean_microservice();
        ms.models[0].field_defns[0].name = "InvoiceNumber".to_string();
        let file = write_definition(&dir, &ms);
        let menus = write_menus(&dir);

        let code = cmd_fix(&file, Some(&menus), false).unwrap();
        assert_eq!(code, 0);

        let fixed = load_microservice(&file).unwrap();
        assert_eq!(fixed.models[0].field_defns[0].name, "invoiceNumber");
    }

    #[test]
    fn test_fix_dry_run_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let mut ms = clean_microservice();
        ms.models[0].field_defns[0].name = "InvoiceNumber".to_string();
        let file = write_definition(&dir, &ms);
        let menus = write_menus(&dir);

        let code = cmd_fix(&file, Some(&menus), true).unwrap();
        assert_eq!(code, 1);

        let untouched = load_microservice(&file).unwrap();
        assert_eq!(untouched.models[0].field_defns[0].name, "InvoiceNumber");
    }

    #[test]
    fn test_generate_writes_artifacts_and_manifest() {
        let dir = TempDir::new().unwrap();
        let file = write_definition(&dir, &clean_microservice());
        let menus = write_menus(&dir);
        let out = dir.path().join("generated");

        let code = cmd_generate(GenerateArgs {
            file: file.clone(),
            out: out.clone(),
            menus: Some(menus),
            no_tests: false,
            overwrite: false,
            fix: false,
            force: false,
            generated_by: "tester".to_string(),
        })
        .unwrap();
        assert_eq!(code, 0);

        assert!(out.join("src/invoice/invoice.controller.gen").exists());
        assert!(out.join(MANIFEST_FILE_NAME).exists());
    }

    #[test]
    fn test_generate_refuses_invalid_definition() {
        let dir = TempDir::new().unwrap();
        let file = write_definition(&dir, &clean_microservice());
        let out = dir.path().join("generated");

        // Missing menus makes validation fail, so generation refuses
        let code = cmd_generate(GenerateArgs {
            file,
            out: out.clone(),
            menus: None,
            no_tests: false,
            overwrite: false,
            fix: false,
            force: false,
            generated_by: "tester".to_string(),
        })
        .unwrap();
        assert_eq!(code, 1);
        assert!(!out.join(MANIFEST_FILE_NAME).exists());
    }

    #[test]
    fn test_status_roundtrip() {
        let dir = TempDir::new().unwrap();
        let ms = clean_microservice();
        let file = write_definition(&dir, &ms);
        let menus = write_menus(&dir);
        let out = dir.path().join("generated");

        // Before generation there is no manifest
        assert_eq!(cmd_status(&file, &out).unwrap(), 1);

        cmd_generate(GenerateArgs {
            file: file.clone(),
            out: out.clone(),
            menus: Some(menus),
            no_tests: true,
            overwrite: false,
            fix: false,
            force: false,
            generated_by: "tester".to_string(),
        })
        .unwrap();
        assert_eq!(cmd_status(&file, &out).unwrap(), 0);

        // Changing the schema makes status report drift
        let mut changed = load_microservice(&file).unwrap();
        changed.models[0]
            .field_defns
            .push(FieldDefn::new("total", DataType::Decimal));
        save_microservice(&changed, &file).unwrap();
        assert_eq!(cmd_status(&file, &out).unwrap(), 1);
    }

    #[test]
    fn test_mark_applied_updates_manifest() {
        let dir = TempDir::new().unwrap();
        let file = write_definition(&dir, &clean_microservice());
        let menus = write_menus(&dir);
        let out = dir.path().join("generated");

        cmd_generate(GenerateArgs {
            file,
            out: out.clone(),
            menus: Some(menus),
            no_tests: true,
            overwrite: false,
            fix: false,
            force: false,
            generated_by: "tester".to_string(),
        })
        .unwrap();

        assert_eq!(cmd_mark_applied(&out, "0001_init", "ops").unwrap(), 0);
        let manifest = ManifestTracker::new(&out)
            .load(out.join(MANIFEST_FILE_NAME))
            .unwrap()
            .unwrap();
        assert_eq!(
            manifest.production_state.unwrap().last_applied_migration,
            "0001_init"
        );
    }

    #[test]
    fn test_load_menus_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("menus.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_menus(Some(&path)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFileFormat(_)));
    }
}
