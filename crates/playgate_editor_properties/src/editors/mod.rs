// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in property editors.
//!
//! Leaf editors edit one typed value. Composite editors (arrays, objects and
//! descriptor-defined types) build nested properties and resolve their child
//! editors through the registry.

pub mod array;
pub mod boolean;
pub mod color_curve;
pub mod curve;
pub mod custom;
pub mod enumeration;
pub mod number;
pub mod object;
pub mod rgb;
pub mod rgba;
pub mod string;
pub mod vector;

pub use array::{ArrayEditor, ArraySession};
pub use boolean::BooleanEditor;
pub use color_curve::{ColorCurveEditor, ColorCurveInfo, ColorCurveKind};
pub use curve::{CurveEditor, CurveInfo, CurveSession};
pub use custom::CustomEditor;
pub use enumeration::{EnumerationEditor, EnumerationInfo};
pub use number::{NumberEditor, NumberInfo};
pub use object::{ObjectEditor, ObjectSession};
pub use rgb::RgbEditor;
pub use rgba::RgbaEditor;
pub use string::StringEditor;
pub use vector::VectorEditor;

use crate::editor::{DrawResult, EditorInput, EditorView, PropertyEditor, Widget};
use crate::property::Property;
use crate::registry::EditorRegistry;
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

/// Ids of the built-in editors, in registration order
pub const BUILTIN_EDITORS: &[&str] = &[
    "number",
    "string",
    "boolean",
    "rgb",
    "rgba",
    "vector",
    "enumeration",
    "curve",
    "colorcurve",
];

/// Register every built-in editor; returns how many registrations succeeded
pub fn register_builtin(registry: &EditorRegistry) -> usize {
    [
        registry.register::<NumberEditor>("number"),
        registry.register::<StringEditor>("string"),
        registry.register::<BooleanEditor>("boolean"),
        registry.register::<RgbEditor>("rgb"),
        registry.register::<RgbaEditor>("rgba"),
        registry.register::<VectorEditor>("vector"),
        registry.register::<EnumerationEditor>("enumeration"),
        registry.register::<CurveEditor>("curve"),
        registry.register::<ColorCurveEditor>("colorcurve"),
    ]
    .into_iter()
    .filter(|registered| *registered)
    .count()
}

/// One row of a composite editor
pub enum ChildRow {
    /// A resolved child editor
    Editor {
        /// Element key (index or object key)
        key: String,
        /// Child editor
        editor: Box<dyn PropertyEditor>,
    },
    /// A child whose editor could not be created
    Error {
        /// Element key (index or object key)
        key: String,
        /// Why the editor is missing
        message: String,
    },
}

impl ChildRow {
    /// Element key
    pub fn key(&self) -> &str {
        match self {
            ChildRow::Editor { key, .. } | ChildRow::Error { key, .. } => key,
        }
    }

    /// Child editor, if resolved
    pub fn editor(&self) -> Option<&(dyn PropertyEditor + 'static)> {
        match self {
            ChildRow::Editor { editor, .. } => Some(editor.as_ref()),
            ChildRow::Error { .. } => None,
        }
    }

    /// Mutable child editor, if resolved
    pub fn editor_mut(&mut self) -> Option<&mut (dyn PropertyEditor + 'static)> {
        match self {
            ChildRow::Editor { editor, .. } => Some(editor.as_mut()),
            ChildRow::Error { .. } => None,
        }
    }

    /// Forward an input to the child editor
    pub fn apply(&mut self, input: EditorInput) -> DrawResult {
        self.editor_mut()
            .map_or(DrawResult::Unchanged, |editor| editor.apply(input))
    }

    /// Describe the row
    pub fn view(&self) -> EditorView {
        match self {
            ChildRow::Editor { editor, .. } => editor.view(),
            ChildRow::Error { key, message } => EditorView {
                label: key.clone(),
                editor: String::new(),
                widget: Widget::Error {
                    message: message.clone(),
                },
            },
        }
    }
}

impl std::fmt::Debug for ChildRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChildRow::Editor { key, editor } => f
                .debug_struct("Editor")
                .field("key", key)
                .field("editor", &editor.property().editor())
                .finish(),
            ChildRow::Error { key, message } => f
                .debug_struct("Error")
                .field("key", key)
                .field("message", message)
                .finish(),
        }
    }
}

/// Build a nested property and its editor.
///
/// The property is returned alongside the row so the caller can subscribe to
/// it; it is `None` when the property itself could not be created.
pub(crate) fn build_child(
    registry: &Rc<EditorRegistry>,
    editor_id: &str,
    key: &str,
    value: Option<Value>,
    editor_data: Option<Value>,
) -> (ChildRow, Option<Rc<Property>>) {
    let property = match Property::with_value(key, editor_id, value, editor_data) {
        Ok(property) => Rc::new(property),
        Err(err) => {
            let row = ChildRow::Error {
                key: key.to_string(),
                message: err.to_string(),
            };
            return (row, None);
        }
    };

    let row = match registry.try_create_control(editor_id, key, Rc::clone(&property)) {
        Ok(editor) => ChildRow::Editor {
            key: key.to_string(),
            editor,
        },
        Err(err) => {
            tracing::warn!("{}", err);
            ChildRow::Error {
                key: key.to_string(),
                message: err.to_string(),
            }
        }
    };
    (row, Some(property))
}

/// Encode a typed value into the property, logging encode failures
pub(crate) fn write_data<T: Serialize>(property: &Property, value: &T) -> DrawResult {
    match property.set_data(value) {
        Ok(()) => DrawResult::Changed,
        Err(err) => {
            tracing::warn!("{}", err);
            DrawResult::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtin() {
        let registry = EditorRegistry::new();
        assert_eq!(register_builtin(&registry), BUILTIN_EDITORS.len());
        assert_eq!(registry.registered_ids(), BUILTIN_EDITORS);

        // Second pass collides with every id
        assert_eq!(register_builtin(&registry), 0);
    }

    #[test]
    fn test_build_child_error_rows() {
        let registry = EditorRegistry::shared();
        register_builtin(&registry);

        let (row, property) = build_child(&registry, "missing", "0", None, None);
        assert!(property.is_some());
        assert!(row.editor().is_none());
        assert_eq!(
            row.view().widget,
            Widget::Error {
                message: "couldn't create 0 property editor of type: missing".to_string()
            }
        );

        let (row, property) = build_child(&registry, "number", "", None, None);
        assert!(property.is_none());
        assert_eq!(row.key(), "");
    }
}
