// SPDX-License-Identifier: MIT OR Apache-2.0
//! Discovery of project editor types.
//!
//! Registrations are project relative: opening a project clears the registry,
//! registers the built-in editors and then every descriptor and template file
//! found under the assets directory.

use playgate_editor_properties::descriptor::DESCRIPTOR_SUFFIX;
use playgate_editor_properties::editors::register_builtin;
use playgate_editor_properties::template::TEMPLATE_SUFFIX;
use playgate_editor_properties::{EditorRegistry, TypeDescriptor};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file that could not be registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFailure {
    /// Offending file or directory
    pub path: PathBuf,
    /// Why it was skipped
    pub message: String,
}

/// Outcome of [`reload_editor_types`]
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    /// Number of built-in editors registered
    pub builtin: usize,
    /// Ids registered from descriptor files, in discovery order
    pub descriptors: Vec<String>,
    /// Ids registered from template files, in discovery order
    pub templates: Vec<String>,
    /// Files that were skipped
    pub failures: Vec<DiscoveryFailure>,
}

impl DiscoveryReport {
    fn fail(&mut self, path: &Path, message: impl Into<String>) {
        let failure = DiscoveryFailure {
            path: path.to_path_buf(),
            message: message.into(),
        };
        tracing::warn!("Skipped editor type {:?}: {}", failure.path, failure.message);
        self.failures.push(failure);
    }
}

/// Editor kind of a discovered file
enum Discovered<'a> {
    Descriptor(&'a str),
    Template(&'a str),
}

fn classify(file_name: &str) -> Option<Discovered<'_>> {
    if let Some(id) = file_name.strip_suffix(DESCRIPTOR_SUFFIX) {
        Some(Discovered::Descriptor(id))
    } else {
        file_name.strip_suffix(TEMPLATE_SUFFIX).map(Discovered::Template)
    }
}

/// Reset `registry` to the built-ins plus the editor types under `assets_dir`.
///
/// Files are visited in file name order. A missing assets directory leaves
/// only the built-ins registered.
pub fn reload_editor_types(registry: &EditorRegistry, assets_dir: &Path) -> DiscoveryReport {
    registry.unregister_all();
    let mut report = DiscoveryReport {
        builtin: register_builtin(registry),
        ..DiscoveryReport::default()
    };

    if !assets_dir.is_dir() {
        tracing::debug!("No assets directory at {:?}", assets_dir);
        return report;
    }

    for entry in WalkDir::new(assets_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(assets_dir).to_path_buf();
                report.fail(&path, err.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(kind) = entry.file_name().to_str().and_then(classify) else {
            continue;
        };

        match kind {
            Discovered::Descriptor(id) => match TypeDescriptor::load(path) {
                Ok(descriptor) => {
                    if registry.register_descriptor(id, descriptor) {
                        report.descriptors.push(id.to_string());
                    } else {
                        report.fail(path, format!("editor id `{id}` is empty or already registered"));
                    }
                }
                Err(err) => report.fail(path, err.to_string()),
            },
            Discovered::Template(id) => {
                if registry.register_template(id, path) {
                    report.templates.push(id.to_string());
                } else {
                    report.fail(path, format!("editor id `{id}` is empty or already registered"));
                }
            }
        }
    }

    tracing::info!(
        "Registered {} built-in, {} descriptor and {} template editors ({} skipped)",
        report.builtin,
        report.descriptors.len(),
        report.templates.len(),
        report.failures.len()
    );
    report
}
