// SPDX-License-Identifier: MIT OR Apache-2.0
//! Three component vector editor.

use super::write_data;
use crate::editor::{
    parse_number, DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, TextDraft,
    Widget,
};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorType;
use playgate_editor_curves::Vector;
use serde_json::{json, Value};
use std::any::Any;
use std::rc::Rc;

/// Editor for `vector` properties.
///
/// Component texts are drafts until commit, and a commit writes only when
/// all three parse.
#[derive(Debug)]
pub struct VectorEditor {
    base: EditorBase,
    drafts: [TextDraft; 3],
}

impl VectorEditor {
    /// Current vector; `(1, 1, 1)` when absent
    pub fn vector(&self) -> Vector {
        self.base.property().data::<Vector>()
    }
}

impl EditorType for VectorEditor {
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError> {
        Ok(Self {
            base: EditorBase::new(name, property),
            drafts: Default::default(),
        })
    }

    fn default_value() -> Option<Value> {
        Some(json!([0.0, 0.0, 0.0]))
    }
}

impl PropertyEditor for VectorEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        let revision = self.base.revision();
        let components = self.vector().to_array();
        let mut fields: [String; 3] = Default::default();
        let mut valid = [true; 3];
        for (index, draft) in self.drafts.iter().enumerate() {
            match draft.get(revision) {
                Some(text) => {
                    fields[index] = text.to_string();
                    valid[index] = parse_number(text).is_some();
                }
                None => fields[index] = components[index].to_string(),
            }
        }
        self.base.view(Widget::Vector { fields, valid })
    }

    fn apply(&mut self, input: EditorInput) -> DrawResult {
        let revision = self.base.revision();
        match input {
            EditorInput::Component { index, text } => match self.drafts.get_mut(index) {
                Some(draft) => {
                    draft.set(revision, text);
                    DrawResult::EditStarted
                }
                None => DrawResult::Unchanged,
            },
            EditorInput::Commit => {
                let mut vector = self.vector();
                let mut edited = false;
                let mut all_valid = true;
                for (index, draft) in self.drafts.iter_mut().enumerate() {
                    let Some(text) = draft.take(revision) else {
                        continue;
                    };
                    edited = true;
                    match parse_number(&text) {
                        Some(value) => vector.set(index, value as f32),
                        None => all_valid = false,
                    }
                }
                if !edited || !all_valid {
                    return DrawResult::Unchanged;
                }
                match write_data(self.base.property(), &vector) {
                    DrawResult::Changed => DrawResult::EditEnded,
                    other => other,
                }
            }
            _ => DrawResult::Unchanged,
        }
    }

    fn update_editor(&mut self) {
        for draft in &mut self.drafts {
            draft.clear();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
