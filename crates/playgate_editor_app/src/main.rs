// SPDX-License-Identifier: MIT OR Apache-2.0
//! `PlayGate` Editor - property inspector tooling
//!
//! A command line front end for the `PlayGate` property framework:
//! - Project settings and project-relative editor type discovery
//! - Inspection of JSON property models through the editor registry
//! - A demonstration model covering every built-in editor
//! - Curve previews
//!
//! ## Architecture
//!
//! Editors are headless. Every command builds a registry, resolves editors
//! through it and prints the views the editors describe.

mod demo;
mod editor_types;
mod project;
mod render;

use clap::{Parser, Subcommand};
use editor_types::reload_editor_types;
use playgate_editor_properties::editors::register_builtin;
use playgate_editor_properties::{EditorRegistry, PropertiesInspector, PropertyError};
use project::{EditorSettings, Project, ProjectError};
use render::ConsoleView;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// `PlayGate` property editor
#[derive(Parser, Debug)]
#[command(name = "playgate_editor", version, about, long_about = None)]
struct Cli {
    /// Project directory; editor types are discovered in its assets directory
    #[arg(short = 'p', long = "project", value_name = "DIR", global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a project in a directory
    New {
        /// Project directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Project name
        #[arg(long)]
        name: String,
    },

    /// List registered editor ids
    Editors,

    /// Show the editors of a JSON properties model
    Inspect {
        /// Model file
        #[arg(value_name = "MODEL")]
        model: PathBuf,
    },

    /// Show the demonstration model
    Demo {
        /// Print the model JSON instead of the editors
        #[arg(long)]
        json: bool,
    },

    /// Preview a curve or curve set file
    Curve {
        /// Curve JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Samples per curve
        #[arg(short = 's', long, value_name = "N")]
        samples: Option<usize>,
    },
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Property(#[from] PropertyError),
}

fn main() {
    let cli = Cli::parse();

    let project = cli.project.as_deref().map(Project::open).transpose();
    let directive = match &project {
        Ok(Some(project)) => project.settings.editor.log_directive.clone(),
        _ => EditorSettings::default().log_directive,
    };
    init_logging(&directive);

    tracing::info!("Starting PlayGate Editor v{}", env!("CARGO_PKG_VERSION"));

    let result = project
        .map_err(AppError::from)
        .and_then(|project| run(cli.command, project.as_ref()));
    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn init_logging(directive: &str) {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let (env_filter, rejected) = match directive.parse() {
        Ok(directive) => (env_filter.add_directive(directive), None),
        Err(err) => (env_filter, Some(err)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(err) = rejected {
        tracing::warn!("Ignored log directive {:?}: {}", directive, err);
    }
}

fn run(command: Commands, project: Option<&Project>) -> Result<(), AppError> {
    if let Some(project) = project {
        tracing::info!("Opened project: {} at {:?}", project.settings.name, project.dir);
    }
    let settings = project.map_or_else(EditorSettings::default, |p| p.settings.editor.clone());

    match command {
        Commands::New { dir, name } => {
            let created = Project::create(&dir, &name)?;
            println!("{}", created.settings.file_path(&created.dir).display());
        }
        Commands::Editors => {
            let registry = load_registry(project);
            for id in registry.registered_ids() {
                match registry.template_path(&id) {
                    Some(path) => println!("{id}\t(template {})", path.display()),
                    None if registry.descriptor(&id).is_some() => println!("{id}\t(custom type)"),
                    None => println!("{id}"),
                }
            }
            if let Some(project) = project {
                let bootstrap = project.bootstrap_script();
                if !bootstrap.is_file() {
                    tracing::warn!("Template bootstrap script not found: {}", bootstrap.display());
                }
            }
        }
        Commands::Inspect { model } => {
            let json = read_file(&model)?;
            let inspector = PropertiesInspector::from_json(&json, load_registry(project))
                .map_err(|source| AppError::Json {
                    path: model.clone(),
                    source,
                })?;
            print!("{}", ConsoleView::new(&inspector.render(), settings.preview_samples));
        }
        Commands::Demo { json } => {
            let model = demo::demo_model()?;
            if json {
                println!("{}", model.to_json()?);
                return Ok(());
            }
            let registry = load_registry(project);
            demo::register_demo_types(&registry);
            let inspector = PropertiesInspector::new(model, registry);
            print!("{}", ConsoleView::new(&inspector.render(), settings.preview_samples));
        }
        Commands::Curve { file, samples } => {
            let json = read_file(&file)?;
            let curves = render::parse_curves(&json).map_err(|source| AppError::Json {
                path: file.clone(),
                source,
            })?;
            let samples = samples.unwrap_or(settings.preview_samples);
            println!("{} curve(s), {}", curves.len(), curves.curve_type().name());
            for (index, line) in render::sparklines(&curves, samples).into_iter().enumerate() {
                println!("{index:>3} {line}");
            }
        }
    }
    Ok(())
}

fn load_registry(project: Option<&Project>) -> Rc<EditorRegistry> {
    let registry = EditorRegistry::shared();
    match project {
        Some(project) => {
            let report = reload_editor_types(&registry, &project.assets_dir());
            if !report.failures.is_empty() {
                tracing::warn!("{} editor type file(s) skipped", report.failures.len());
            }
        }
        None => {
            register_builtin(&registry);
        }
    }
    registry
}

fn read_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}
