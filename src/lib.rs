pub mod cli;
pub mod config;
pub mod conventions;
pub mod generator;
pub mod linker;
pub mod model;
pub mod parser;
pub mod utils;

// Re-export frequently used items for easier access
pub use config::{PathRole, PathsConfig};
pub use conventions::Conventions;
pub use generator::{Artifact, RenderSettings, Superclass, WorkflowRequest};
pub use linker::link_siblings;
pub use model::{Endpoint, Verb};
pub use parser::{parse_spec_file, ApiSpec, Selector};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use generator::suite;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Parser error: {0}")]
    ParserError(#[from] parser::ParserError),

    #[error("Model error: {0}")]
    ModelError(#[from] model::ModelError),

    #[error("Generator error: {0}")]
    GeneratorError(#[from] generator::GeneratorError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Select, model and link the endpoints of a generation request.
pub fn load_endpoints<P: AsRef<Path>>(
    spec_file: P,
    selector: &Selector,
    conventions: &Conventions,
) -> Result<Vec<Endpoint>> {
    let operations = parser::select_from_file(spec_file, selector)?;
    let mut endpoints = model::build_endpoints(&operations, conventions)?;
    let report = linker::link_siblings(&mut endpoints);
    debug!(
        endpoints = endpoints.len(),
        links = report.links.len(),
        unlinked = report.unlinked.len(),
        "endpoints ready"
    );
    Ok(endpoints)
}

/// Test script for one operation, written into `script_dir`.
pub fn generate_file<P: AsRef<Path>, Q: AsRef<Path>>(
    spec_file: P,
    operation_id: &str,
    settings: &RenderSettings,
    superclass: &str,
    script_dir: Q,
) -> Result<Vec<PathBuf>> {
    let selector = Selector::OperationId(operation_id.to_string());
    let endpoints = load_endpoints(spec_file, &selector, &settings.conventions)?;
    let endpoint = endpoints.first().ok_or_else(|| {
        generator::GeneratorError::NothingToGenerate(format!("no operation \"{}\"", operation_id))
    })?;
    let superclass = Superclass::from_class_name(superclass, &settings.conventions);
    let artifacts = suite::plan_file(endpoint, settings, &superclass, script_dir.as_ref());
    Ok(generator::write_artifacts(&artifacts)?)
}

/// Test module for every operation of a tag, under `module_root`.
pub fn generate_module<P: AsRef<Path>, Q: AsRef<Path>>(
    spec_file: P,
    tag: &str,
    settings: &RenderSettings,
    superclass: &str,
    module_root: Q,
) -> Result<Vec<PathBuf>> {
    let endpoints = load_endpoints(spec_file, &Selector::Tag(tag.to_string()), &settings.conventions)?;
    let superclass = Superclass::from_class_name(superclass, &settings.conventions);
    let artifacts = suite::plan_module(&endpoints, settings, &superclass, module_root.as_ref())?;
    let written = generator::write_artifacts(&artifacts)?;
    info!(tag, scripts = written.len().saturating_sub(1), "module generated");
    Ok(written)
}

/// API call wrappers of a tag.
pub fn generate_submodule<P: AsRef<Path>, Q: AsRef<Path>>(
    spec_file: P,
    tag: &str,
    settings: &RenderSettings,
    dir: Q,
) -> Result<PathBuf> {
    let endpoints = load_endpoints(spec_file, &Selector::Tag(tag.to_string()), &settings.conventions)?;
    let artifact = suite::plan_submodule(&endpoints, tag, settings, dir.as_ref())?;
    generator::write_artifact(&artifact)?;
    Ok(artifact.path)
}

/// Pipeline conf of a tag.
pub fn generate_conf<P: AsRef<Path>, Q: AsRef<Path>>(
    spec_file: P,
    tag: &str,
    nomenclature: &str,
    settings: &RenderSettings,
    conf_dir: Q,
) -> Result<PathBuf> {
    let endpoints = load_endpoints(spec_file, &Selector::Tag(tag.to_string()), &settings.conventions)?;
    let artifact = suite::plan_conf(&endpoints, tag, nomenclature, settings, conf_dir.as_ref())?;
    generator::write_artifact(&artifact)?;
    Ok(artifact.path)
}

/// Smoke upgrade workflow under `root/<cloud>/`.
pub fn generate_smoke_upgrade<P: AsRef<Path>>(request: &WorkflowRequest, root: P) -> Result<PathBuf> {
    let artifact = suite::plan_workflow(request, root.as_ref())?;
    generator::write_artifact(&artifact)?;
    Ok(artifact.path)
}

/// Linked endpoint records as pretty JSON.
pub fn inspect<P: AsRef<Path>>(spec_file: P, selector: &Selector, conventions: &Conventions) -> Result<String> {
    let endpoints = load_endpoints(spec_file, selector, conventions)?;
    Ok(serde_json::to_string_pretty(&endpoints)?)
}
