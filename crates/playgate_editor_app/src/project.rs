// SPDX-License-Identifier: MIT OR Apache-2.0
//! Project settings and project directory handling.
//!
//! A project is a directory holding one `<name>.pgproject` file (pretty RON)
//! next to the assets directory the editor types are discovered in.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current project settings format version
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Extension of project settings files
pub const PROJECT_FILE_EXTENSION: &str = "pgproject";

/// Errors raised while reading or writing project settings
#[derive(Debug, Error)]
pub enum ProjectError {
    /// File system failure
    #[error("project I/O error at {}: {source}", .path.display())]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid RON
    #[error("invalid project file {}: {source}", .path.display())]
    Decode {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: ron::error::SpannedError,
    },

    /// Settings could not be encoded
    #[error("failed to encode project settings: {0}")]
    Encode(#[from] ron::Error),

    /// The file was written by a newer editor
    #[error("project version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },

    /// No project file in the directory
    #[error("no .pgproject file in {}", .0.display())]
    NotFound(PathBuf),
}

/// Editor settings stored in the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Assets directory, relative to the project directory
    pub assets_dir: String,
    /// Script evaluated before a template editor is initialized
    pub bootstrap_script: PathBuf,
    /// Samples taken when previewing a curve
    pub preview_samples: usize,
    /// Default tracing directive when `RUST_LOG` is unset
    pub log_directive: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            bootstrap_script: PathBuf::from(playgate_editor_properties::template::DEFAULT_BOOTSTRAP),
            preview_samples: 64,
            log_directive: "playgate_editor_app=info".to_string(),
        }
    }
}

/// Complete project settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Settings format version
    pub version: u32,
    /// Project name, also the settings file stem
    pub name: String,
    /// Editor settings
    #[serde(default)]
    pub editor: EditorSettings,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl ProjectSettings {
    /// Create settings for a named project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION,
            name: name.into(),
            editor: EditorSettings::default(),
        }
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: ProjectSettings =
            ron::from_str(&content).map_err(|source| ProjectError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        if settings.version > PROJECT_FORMAT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: settings.version,
                supported: PROJECT_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, config)?;

        std::fs::write(path, content).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings file path of this project inside `project_dir`
    pub fn file_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(format!("{}.{PROJECT_FILE_EXTENSION}", self.name))
    }

    /// First settings file in `project_dir`, by file name
    pub fn find(project_dir: &Path) -> Result<PathBuf, ProjectError> {
        let entries = std::fs::read_dir(project_dir).map_err(|source| ProjectError::Io {
            path: project_dir.to_path_buf(),
            source,
        })?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(PROJECT_FILE_EXTENSION)
            })
            .collect();
        candidates.sort();

        candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProjectError::NotFound(project_dir.to_path_buf()))
    }
}

/// An open project directory
#[derive(Debug, Clone)]
pub struct Project {
    /// Project directory
    pub dir: PathBuf,
    /// Loaded settings
    pub settings: ProjectSettings,
}

impl Project {
    /// Open the project in `dir`
    pub fn open(dir: &Path) -> Result<Self, ProjectError> {
        let path = ProjectSettings::find(dir)?;
        let settings = ProjectSettings::load(&path)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            settings,
        })
    }

    /// Create a project in `dir` with an empty assets directory
    pub fn create(dir: &Path, name: &str) -> Result<Self, ProjectError> {
        let settings = ProjectSettings::new(name);
        let assets = dir.join(&settings.editor.assets_dir);
        std::fs::create_dir_all(&assets).map_err(|source| ProjectError::Io {
            path: assets.clone(),
            source,
        })?;
        settings.save(&settings.file_path(dir))?;

        tracing::info!("Created new project: {} at {:?}", name, dir);
        Ok(Self {
            dir: dir.to_path_buf(),
            settings,
        })
    }

    /// Assets directory path
    pub fn assets_dir(&self) -> PathBuf {
        self.dir.join(&self.settings.editor.assets_dir)
    }

    /// Bootstrap script path; relative paths resolve against the project
    pub fn bootstrap_script(&self) -> PathBuf {
        let script = &self.settings.editor.bootstrap_script;
        if script.is_absolute() {
            script.clone()
        } else {
            self.dir.join(script)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ProjectSettings::default();
        assert_eq!(settings.version, PROJECT_FORMAT_VERSION);
        assert_eq!(settings.editor.assets_dir, "assets");
        assert_eq!(settings.editor.preview_samples, 64);
        assert_eq!(
            settings.editor.bootstrap_script,
            PathBuf::from("resources/templates/api.wrapper.js")
        );
    }

    #[test]
    fn test_serialization() {
        let settings = ProjectSettings::new("Test Project");
        let ron_str =
            ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: ProjectSettings = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_editor_block_uses_defaults() {
        let loaded: ProjectSettings = ron::from_str(r#"(version: 1, name: "Old")"#).unwrap();
        assert_eq!(loaded.editor, EditorSettings::default());
    }

    #[test]
    fn test_create_and_open_project() {
        let dir = tempfile::tempdir().unwrap();
        let created = Project::create(dir.path(), "Demo").unwrap();
        assert!(created.assets_dir().is_dir());
        assert!(dir.path().join("Demo.pgproject").is_file());

        let opened = Project::open(dir.path()).unwrap();
        assert_eq!(opened.settings, created.settings);
        assert_eq!(
            opened.bootstrap_script(),
            dir.path().join("resources/templates/api.wrapper.js")
        );
    }

    #[test]
    fn test_open_rejects_missing_and_newer_projects() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Project::open(dir.path()), Err(ProjectError::NotFound(_))));

        let mut settings = ProjectSettings::new("Future");
        settings.version = PROJECT_FORMAT_VERSION + 1;
        settings.save(&settings.file_path(dir.path())).unwrap();
        assert!(matches!(
            Project::open(dir.path()),
            Err(ProjectError::UnsupportedVersion { .. })
        ));
    }
}
