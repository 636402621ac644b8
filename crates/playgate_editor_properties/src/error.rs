// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the property framework.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or writing properties
#[derive(Debug, Error)]
pub enum PropertyError {
    /// Property name was empty
    #[error("property name cannot be empty")]
    EmptyName,

    /// Editor id was empty
    #[error("editor id of property `{0}` cannot be empty")]
    EmptyEditor(String),

    /// A typed value could not be encoded as JSON
    #[error("failed to encode value of property `{name}`: {source}")]
    Encode {
        /// Property name
        name: String,
        /// Underlying encoder error
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration and resolution errors of the editor registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A registered editor type has no default value provider
    #[error("editor does not provide default value: {0}")]
    MissingDefault(String),

    /// A default value provider returned nothing usable
    #[error("got invalid default value for editor: {0}")]
    InvalidDefault(String),

    /// No store knows the editor id
    #[error("there is no registered editor type named: {0}")]
    UnknownEditor(String),

    /// Resolution failed for a named property
    #[error("couldn't create {name} property editor of type: {id}")]
    Unresolved {
        /// Property name
        name: String,
        /// Editor id that failed to resolve
        id: String,
    },

    /// An editor factory refused to build an editor
    #[error("failed to create editor `{id}`: {message}")]
    Construction {
        /// Editor id
        id: String,
        /// Reason reported by the factory
        message: String,
    },

    /// A property could not be created or written
    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// Errors loading `.editor.json` type descriptors
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Reading the file failed
    #[error("cannot read custom editor {}: {source}", .path.display())]
    Io {
        /// Descriptor path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file was empty
    #[error("cannot load custom editor: {}", .0.display())]
    Empty(PathBuf),

    /// The file was not a valid descriptor
    #[error("invalid custom editor {}: {source}", .path.display())]
    Parse {
        /// Descriptor path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors of template-file editor sessions
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file does not exist
    #[error("template file not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    /// The bootstrap script does not exist
    #[error("editor could not load API wrapper: {}", .0.display())]
    MissingBootstrap(PathBuf),

    /// Reading a file failed
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The host reported a failure
    #[error("template host error: {0}")]
    Host(String),

    /// The initialization hook did not return `true`
    #[error("editor was not properly initialized")]
    NotInitialized,

    /// A signal arrived with an unknown name
    #[error("unknown editor signal: {0}")]
    UnknownSignal(String),

    /// A signal payload was not valid JSON of the expected shape
    #[error("malformed payload for {signal}: {source}")]
    MalformedSignal {
        /// Signal name
        signal: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The session was already closed
    #[error("editor session is closed")]
    Closed,
}
