//! Persisted path configuration.
//!
//! The file holds one `key:value` line per directory role. Only the first
//! colon separates key from value, so Windows drive letters survive.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::utils::write_to_file;

pub const DEFAULT_PATHS_FILE: &str = "paths.cb";
/// File name looked up when `readPath` names a directory.
pub const SPEC_FILE_NAME: &str = "openapi.generated.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No {0} configured, set it with the paths command")]
    MissingPath(PathRole),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("No specification found at {}", .0.display())]
    SpecNotFound(PathBuf),
}

/// Directory roles the generator reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathRole {
    ScriptDir,
    ModulePath,
    ReadPath,
    ConfDir,
    SmokeUpgradeDir,
    SubmodulePath,
}

impl PathRole {
    pub const ALL: [PathRole; 6] = [
        PathRole::ScriptDir,
        PathRole::ModulePath,
        PathRole::ReadPath,
        PathRole::ConfDir,
        PathRole::SmokeUpgradeDir,
        PathRole::SubmodulePath,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PathRole::ScriptDir => "scriptDir",
            PathRole::ModulePath => "modulePath",
            PathRole::ReadPath => "readPath",
            PathRole::ConfDir => "confDir",
            PathRole::SmokeUpgradeDir => "smokeUpgradeDir",
            PathRole::SubmodulePath => "submodulePath",
        }
    }

    pub fn from_key(key: &str) -> Option<PathRole> {
        PathRole::ALL.iter().copied().find(|role| role.key() == key)
    }
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathsConfig {
    entries: BTreeMap<PathRole, PathBuf>,
}

impl PathsConfig {
    /// Parse `key:value` lines. Unknown keys and blank values are skipped.
    pub fn parse(content: &str) -> Self {
        let mut config = PathsConfig::default();
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((key, value)) = line.split_once(':') else {
                warn!(line, "ignoring malformed path configuration line");
                continue;
            };
            let value = value.trim();
            match PathRole::from_key(key.trim()) {
                Some(role) if !value.is_empty() => config.set(role, PathBuf::from(value)),
                Some(_) => {}
                None => warn!(key, "ignoring unknown path configuration key"),
            }
        }
        config
    }

    /// Load the file; a missing file is an empty configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no path configuration yet");
            return Ok(PathsConfig::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(PathsConfig::parse(&content))
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(role, value)| format!("{}:{}\n", role.key(), value.display()))
            .collect()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        write_to_file(path, self.render()).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, role: PathRole) -> Option<&Path> {
        self.entries.get(&role).map(PathBuf::as_path)
    }

    pub fn require(&self, role: PathRole) -> Result<&Path, ConfigError> {
        self.get(role).ok_or(ConfigError::MissingPath(role))
    }

    pub fn set(&mut self, role: PathRole, value: PathBuf) {
        self.entries.insert(role, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (PathRole, &Path)> {
        self.entries.iter().map(|(role, path)| (*role, path.as_path()))
    }
}

/// Check a candidate value for a role and return what is stored.
///
/// Directories must exist. `readPath` may name the specification file or a
/// directory holding `openapi.generated.yaml`; the file path is stored.
/// `submodulePath` is accepted as given.
pub fn validate_path(role: PathRole, value: &Path) -> Result<PathBuf, ConfigError> {
    match role {
        PathRole::SubmodulePath => Ok(value.to_path_buf()),
        PathRole::ReadPath if value.is_file() => Ok(value.to_path_buf()),
        PathRole::ReadPath => {
            let candidate = value.join(SPEC_FILE_NAME);
            if candidate.is_file() {
                Ok(candidate)
            } else {
                Err(ConfigError::SpecNotFound(candidate))
            }
        }
        _ if value.is_dir() => Ok(value.to_path_buf()),
        _ => Err(ConfigError::NotADirectory(value.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_keeps_drive_letters() {
        let config = PathsConfig::parse("readPath:C:\\specs\\openapi.yaml\nconfDir:/conf\nbogus:/x\nscriptDir:\n");
        assert_eq!(config.get(PathRole::ReadPath), Some(Path::new("C:\\specs\\openapi.yaml")));
        assert_eq!(config.get(PathRole::ConfDir), Some(Path::new("/conf")));
        assert_eq!(config.get(PathRole::ScriptDir), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let file = dir.path().join(DEFAULT_PATHS_FILE);
        let mut config = PathsConfig::default();
        config.set(PathRole::SubmodulePath, PathBuf::from("/lib"));
        config.set(PathRole::ScriptDir, PathBuf::from("/scripts"));
        config.save(&file).unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "scriptDir:/scripts\nsubmodulePath:/lib\n"
        );
        assert_eq!(PathsConfig::load(&file).unwrap(), config);
        assert_eq!(PathsConfig::load(dir.path().join("missing")).unwrap(), PathsConfig::default());
    }

    #[test]
    fn test_require_reports_role() {
        let err = PathsConfig::default().require(PathRole::ConfDir).unwrap_err();
        assert_eq!(err.to_string(), "No confDir configured, set it with the paths command");
    }

    #[test]
    fn test_validate_read_path() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            validate_path(PathRole::ReadPath, dir.path()),
            Err(ConfigError::SpecNotFound(_))
        ));
        std::fs::write(dir.path().join(SPEC_FILE_NAME), "openapi: 3.0.0\n").unwrap();
        assert_eq!(
            validate_path(PathRole::ReadPath, dir.path()).unwrap(),
            dir.path().join(SPEC_FILE_NAME)
        );
        assert!(matches!(
            validate_path(PathRole::ConfDir, &dir.path().join("nope")),
            Err(ConfigError::NotADirectory(_))
        ));
    }
}
