// SPDX-License-Identifier: MIT OR Apache-2.0
//! Properties inspector: one editor row per model property.

use crate::editor::{DrawResult, EditorInput, EditorView, PropertyEditor, Widget};
use crate::event::Observers;
use crate::property::PropertiesModel;
use crate::registry::EditorRegistry;
use std::rc::Rc;

/// One inspector row
pub enum InspectorRow {
    /// A resolved editor
    Editor(Box<dyn PropertyEditor>),
    /// A property whose editor could not be created
    Error {
        /// Property name
        name: String,
        /// Requested editor id
        editor: String,
        /// Why the editor is missing
        message: String,
    },
}

impl InspectorRow {
    /// Name of the property shown in this row
    pub fn name(&self) -> &str {
        match self {
            InspectorRow::Editor(editor) => editor.property().name(),
            InspectorRow::Error { name, .. } => name,
        }
    }

    /// Describe the row
    pub fn view(&self) -> EditorView {
        match self {
            InspectorRow::Editor(editor) => editor.view(),
            InspectorRow::Error {
                name,
                editor,
                message,
            } => EditorView {
                label: name.clone(),
                editor: editor.clone(),
                widget: Widget::Error {
                    message: message.clone(),
                },
            },
        }
    }
}

impl std::fmt::Debug for InspectorRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InspectorRow::Editor(editor) => f
                .debug_tuple("Editor")
                .field(&editor.property().name())
                .finish(),
            InspectorRow::Error { name, message, .. } => f
                .debug_struct("Error")
                .field("name", name)
                .field("message", message)
                .finish(),
        }
    }
}

/// Builds and owns the editors of a [`PropertiesModel`].
///
/// A property whose editor cannot be created becomes an error row; building
/// never fails as a whole.
pub struct PropertiesInspector {
    model: PropertiesModel,
    registry: Rc<EditorRegistry>,
    rows: Vec<InspectorRow>,
    layout_changed: Rc<Observers<str>>,
}

impl PropertiesInspector {
    /// Build rows for every property of `model`
    pub fn new(model: PropertiesModel, registry: Rc<EditorRegistry>) -> Self {
        let mut inspector = Self {
            model,
            registry,
            rows: Vec::new(),
            layout_changed: Rc::new(Observers::new()),
        };
        inspector.rebuild();
        inspector
    }

    /// Parse a model and build rows; empty text gives an empty inspector
    pub fn from_json(json: &str, registry: Rc<EditorRegistry>) -> Result<Self, serde_json::Error> {
        let model = if json.trim().is_empty() {
            PropertiesModel::new()
        } else {
            PropertiesModel::from_json(json)?
        };
        Ok(Self::new(model, registry))
    }

    /// Recreate every row from the model
    pub fn rebuild(&mut self) {
        self.rows.clear();
        for property in self.model.iter() {
            let row = match self.registry.try_create_control(
                property.editor(),
                property.name(),
                Rc::clone(property),
            ) {
                Ok(editor) => {
                    let relay = Rc::clone(&self.layout_changed);
                    editor
                        .layout_changed()
                        .subscribe(move |name: &str| relay.notify(name));
                    InspectorRow::Editor(editor)
                }
                Err(err) => {
                    tracing::warn!("{}", err);
                    InspectorRow::Error {
                        name: property.name().to_string(),
                        editor: property.editor().to_string(),
                        message: err.to_string(),
                    }
                }
            };
            self.rows.push(row);
        }
        tracing::debug!(
            "Inspector rebuilt: {} rows, {} errors",
            self.rows.len(),
            self.error_count()
        );
        self.update_content(None);
    }

    /// Re-synchronise editors with their properties; `None` updates all
    pub fn update_content(&mut self, name: Option<&str>) {
        for row in &mut self.rows {
            if let InspectorRow::Editor(editor) = row {
                if name.map_or(true, |name| editor.property().name() == name) {
                    editor.update_editor();
                }
            }
        }
    }

    /// Describe every row in model order
    pub fn render(&self) -> Vec<EditorView> {
        self.rows.iter().map(InspectorRow::view).collect()
    }

    /// Rows in model order
    pub fn rows(&self) -> &[InspectorRow] {
        &self.rows
    }

    /// Number of error rows
    pub fn error_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, InspectorRow::Error { .. }))
            .count()
    }

    /// Editor of a property
    pub fn editor(&self, name: &str) -> Option<&(dyn PropertyEditor + 'static)> {
        self.rows.iter().find_map(|row| match row {
            InspectorRow::Editor(editor) if editor.property().name() == name => {
                Some(editor.as_ref())
            }
            _ => None,
        })
    }

    /// Mutable editor of a property
    pub fn editor_mut(&mut self, name: &str) -> Option<&mut (dyn PropertyEditor + 'static)> {
        self.rows.iter_mut().find_map(|row| match row {
            InspectorRow::Editor(editor) if editor.property().name() == name => {
                Some(editor.as_mut())
            }
            _ => None,
        })
    }

    /// Apply an input to a property's editor; `None` when there is no editor
    pub fn apply(&mut self, name: &str, input: EditorInput) -> Option<DrawResult> {
        self.editor_mut(name).map(|editor| editor.apply(input))
    }

    /// Model being inspected
    pub fn model(&self) -> &PropertiesModel {
        &self.model
    }

    /// Registry used to build rows
    pub fn registry(&self) -> &Rc<EditorRegistry> {
        &self.registry
    }

    /// Raised when any editor's layout changes
    pub fn layout_changed(&self) -> &Observers<str> {
        &self.layout_changed
    }
}

impl std::fmt::Debug for PropertiesInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertiesInspector")
            .field("model", &self.model)
            .field("rows", &self.rows)
            .finish()
    }
}
