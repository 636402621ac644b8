// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plain text field.

use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorType;
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

/// Editor for `string` properties; every keystroke is written through
#[derive(Debug)]
pub struct StringEditor {
    base: EditorBase,
}

impl EditorType for StringEditor {
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError> {
        Ok(Self {
            base: EditorBase::new(name, property),
        })
    }

    fn default_value() -> Option<Value> {
        Some(Value::String(String::new()))
    }
}

impl PropertyEditor for StringEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        self.base.view(Widget::Text {
            text: self.base.property().data::<String>(),
            valid: true,
        })
    }

    fn apply(&mut self, input: EditorInput) -> DrawResult {
        match input {
            EditorInput::Text(text) => {
                self.base.property().set_value(Some(Value::String(text)));
                DrawResult::Changed
            }
            _ => DrawResult::Unchanged,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
