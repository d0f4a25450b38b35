//! Generation orchestration
//!
//! Models are processed strictly sequentially, in the order they appear in
//! the microservice, and the first render failure aborts the whole batch.
//! Partial output never reaches disk because nothing is written until the
//! complete bundle exists. App-wide route registration is assembled after
//! the per-model pass, so its ordering matches the model ordering exactly.

use tracing::{debug, info};

use crate::placeholders::{render, PlaceholderKey, PlaceholderMap};
use crate::{FileType, GeneratedBundle, GeneratedFile, GeneratorConfig};
use forge_core::EngineResult;
use forge_ir::Microservice;

// ============================================================================
// Templates
// ============================================================================

/// One artifact template: a path pattern and a body, both carrying tokens
#[derive(Debug, Clone)]
pub struct ArtifactTemplate {
    /// Artifact kind, also used to name the template in render errors
    pub kind: FileType,

    /// Output path pattern; `@gen{..}` tokens are substituted per model
    pub path_pattern: String,

    /// Template body
    pub body: String,
}

impl ArtifactTemplate {
    pub fn new(
        kind: FileType,
        path_pattern: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path_pattern: path_pattern.into(),
            body: body.into(),
        }
    }
}

/// The templates one generation run renders for each model, plus the
/// app-level route registration rendered once at the end.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    /// Rendered once per model
    pub per_model: Vec<ArtifactTemplate>,

    /// Rendered once per microservice with the accumulated route wiring
    pub app_routes: Option<ArtifactTemplate>,
}

impl TemplateSet {
    /// Empty template set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a per-model template, builder-style
    pub fn with_template(mut self, template: ArtifactTemplate) -> Self {
        self.per_model.push(template);
        self
    }

    /// Set the app-routes template
    pub fn with_app_routes(mut self, template: ArtifactTemplate) -> Self {
        self.app_routes = Some(template);
        self
    }

    /// Built-in template set producing the standard four artifacts per model.
    pub fn standard() -> Self {
        Self::new()
            .with_template(ArtifactTemplate::new(
                FileType::Controller,
                "src/@gen{MODEL_KEBAB}/@gen{MODEL_KEBAB}.controller.gen",
                include_str!("templates/controller.tmpl"),
            ))
            .with_template(ArtifactTemplate::new(
                FileType::Schema,
                "src/@gen{MODEL_KEBAB}/@gen{MODEL_KEBAB}.schema.gen",
                include_str!("templates/schema.tmpl"),
            ))
            .with_template(ArtifactTemplate::new(
                FileType::Routes,
                "src/@gen{MODEL_KEBAB}/@gen{MODEL_KEBAB}.routes.gen",
                include_str!("templates/routes.tmpl"),
            ))
            .with_template(ArtifactTemplate::new(
                FileType::Test,
                "test/@gen{MODEL_KEBAB}.spec.gen",
                include_str!("templates/test.tmpl"),
            ))
            .with_app_routes(ArtifactTemplate::new(
                FileType::AppRoutes,
                "src/app.routes.gen",
                include_str!("templates/app_routes.tmpl"),
            ))
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Sequential per-model code generator
#[derive(Debug, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator with the given configuration
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration
    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate all artifacts for a microservice.
    ///
    /// Models render in input order; the first failing template aborts the
    /// batch and nothing is returned.
    pub fn generate(
        &self,
        microservice: &Microservice,
        templates: &TemplateSet,
    ) -> EngineResult<GeneratedBundle> {
        let mut bundle = GeneratedBundle::new(&microservice.name);
        let mut route_wiring = Vec::new();

        for model in &microservice.models {
            let map = PlaceholderMap::for_model(model, microservice);

            for template in &templates.per_model {
                if template.kind == FileType::Test && !self.config.generate_tests {
                    continue;
                }
                let path = render_path(template, &map)?;
                let content = render(template.kind.label(), &template.body, &map)?;
                bundle.add_file(GeneratedFile::new(path, content, template.kind));
            }

            if let Some(wiring) = map.get(PlaceholderKey::RouteWiring) {
                route_wiring.push(wiring.to_string());
            }
            debug!(model = %model.name, "model artifacts rendered");
        }

        if let Some(template) = &templates.app_routes {
            let map = PlaceholderMap::new()
                .with(PlaceholderKey::MicroserviceName, microservice.name.clone())
                .with(PlaceholderKey::RouteWiring, route_wiring.join("\n"));
            let path = render_path(template, &map)?;
            let content = render(template.kind.label(), &template.body, &map)?;
            bundle.add_file(GeneratedFile::new(path, content, template.kind));
        }

        info!(
            microservice = %microservice.name,
            models = microservice.models.len(),
            files = bundle.file_count(),
            "code generation complete"
        );
        Ok(bundle)
    }

    /// Generate and write the bundle under the configured output directory
    pub fn generate_to_dir(
        &self,
        microservice: &Microservice,
        templates: &TemplateSet,
    ) -> EngineResult<GeneratedBundle> {
        let bundle = self.generate(microservice, templates)?;
        bundle.write_to_disk(&self.config.output_dir, self.config.overwrite)?;
        Ok(bundle)
    }
}

fn render_path(template: &ArtifactTemplate, map: &PlaceholderMap) -> EngineResult<String> {
    let rendered = render(template.kind.label(), &template.path_pattern, map)?;
    Ok(rendered.trim_end().to_string())
}

/// Generate with a default generator
pub fn generate(
    microservice: &Microservice,
    templates: &TemplateSet,
) -> EngineResult<GeneratedBundle> {
    Generator::with_defaults().generate(microservice, templates)
}

// ============================================================================
// Summary
// ============================================================================

/// Counts for reporting a finished generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub microservice_name: String,
    pub total_files: usize,
    pub controllers: usize,
    pub schemas: usize,
    pub routes: usize,
    pub tests: usize,
    pub warnings: usize,
}

/// Summarize a generated bundle
pub fn summarize(bundle: &GeneratedBundle) -> GenerationSummary {
    GenerationSummary {
        microservice_name: bundle.name.clone(),
        total_files: bundle.file_count(),
        controllers: bundle.files_by_type(FileType::Controller).len(),
        schemas: bundle.files_by_type(FileType::Schema).len(),
        routes: bundle.files_by_type(FileType::Routes).len(),
        tests: bundle.files_by_type(FileType::Test).len(),
        warnings: bundle.warnings.len(),
    }
}

// ============================================================================
// Tests
// ============================================================================
