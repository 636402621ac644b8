// SPDX-License-Identifier: MIT OR Apache-2.0
//! Declarative custom types loaded from `.editor.json` files.

use crate::error::DescriptorError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// File suffix of type descriptor files
pub const DESCRIPTOR_SUFFIX: &str = ".editor.json";

/// One nested property of a custom type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Editor id resolved through the registry
    #[serde(rename = "editorId", default, skip_serializing_if = "Option::is_none")]
    pub editor_id: Option<String>,
    /// Editor data handed to the nested property
    #[serde(rename = "editorData", default, skip_serializing_if = "Option::is_none")]
    pub editor_data: Option<Value>,
    /// Inline custom type used instead of `editor_id`
    #[serde(rename = "typeDescriptor", default, skip_serializing_if = "Option::is_none")]
    pub type_descriptor: Option<Box<TypeDescriptor>>,
}

impl PropertyDescriptor {
    /// Describe a property edited by `editor_id`
    pub fn new(editor_id: impl Into<String>) -> Self {
        Self {
            editor_id: Some(editor_id.into()),
            ..Default::default()
        }
    }

    /// Attach editor data
    pub fn with_editor_data(mut self, data: Value) -> Self {
        self.editor_data = Some(data);
        self
    }

    /// Describe a property edited by an inline custom type
    pub fn inline(descriptor: TypeDescriptor) -> Self {
        Self {
            type_descriptor: Some(Box::new(descriptor)),
            ..Default::default()
        }
    }

    /// Editor id, ignoring empty strings
    pub fn editor_id(&self) -> Option<&str> {
        self.editor_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A custom type: named nested properties plus a default value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Nested properties by key
    #[serde(default)]
    pub properties: IndexMap<String, PropertyDescriptor>,
    /// Value used when the property is reset to its default
    #[serde(rename = "defaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl TypeDescriptor {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a nested property
    pub fn with_property(mut self, key: impl Into<String>, property: PropertyDescriptor) -> Self {
        self.properties.insert(key.into(), property);
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Nested property keys in ascending order
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Parse a descriptor from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a descriptor file
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let content = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Err(DescriptorError::Empty(path.to_path_buf()));
        }
        Self::from_json(&content).map_err(|source| DescriptorError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
