pub mod context;
pub mod ladder;
pub mod layout;
pub mod pipeline_conf;
pub mod settings;
pub mod suite;
pub mod test_script;
pub mod workflow;
pub mod wrapper;

pub use ladder::{CombinationPolicy, ExpectedError, Slot};
pub use pipeline_conf::{conf_file_name, render_pipeline_conf};
pub use settings::{RenderSettings, Superclass};
pub use test_script::render_test_script;
pub use workflow::{render_workflow, Cloud, WorkflowRequest};
pub use wrapper::{render_wrapper_function, render_wrapper_module};

use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::utils::{display_path, write_to_file};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid workflow input: {0}")]
    InvalidWorkflowInput(String),

    #[error("Nothing to generate: {0}")]
    NothingToGenerate(String),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// One generated output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Artifact {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Write one artifact, creating parent directories. The file is closed before returning.
pub fn write_artifact(artifact: &Artifact) -> Result<()> {
    write_to_file(&artifact.path, &artifact.contents).map_err(|source| GeneratorError::Write {
        path: artifact.path.clone(),
        source,
    })?;
    info!(path = %display_path(&artifact.path), "generated");
    Ok(())
}

/// Write artifacts in order, stopping at the first failure. Files written
/// before the failure are kept.
pub fn write_artifacts(artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        write_artifact(artifact)?;
        written.push(artifact.path.clone());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_artifact_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Clusters").join("get_clusters.py");
        write_artifact(&Artifact::new(&path, "pass\n")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pass\n");
    }

    #[test]
    fn test_write_failure_names_the_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let artifacts = vec![
            Artifact::new(dir.path().join("first.py"), "a"),
            Artifact::new(blocker.join("second.py"), "b"),
            Artifact::new(dir.path().join("third.py"), "c"),
        ];
        let err = write_artifacts(&artifacts).unwrap_err();
        match err {
            GeneratorError::Write { path, .. } => assert_eq!(path, blocker.join("second.py")),
            other => panic!("unexpected error {other}"),
        }
        assert!(dir.path().join("first.py").exists());
        assert!(!dir.path().join("third.py").exists());
    }
}
