// SPDX-License-Identifier: MIT OR Apache-2.0
//! Checkbox editor.

use crate::editor::{DrawResult, EditorBase, EditorInput, EditorView, PropertyEditor, Widget};
use crate::error::RegistryError;
use crate::property::Property;
use crate::registry::EditorType;
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

/// Editor for `boolean` properties
#[derive(Debug)]
pub struct BooleanEditor {
    base: EditorBase,
}

impl BooleanEditor {
    /// Current state; false when absent
    pub fn checked(&self) -> bool {
        self.base.property().data::<bool>()
    }
}

impl EditorType for BooleanEditor {
    fn create(name: &str, property: Rc<Property>) -> Result<Self, RegistryError> {
        Ok(Self {
            base: EditorBase::new(name, property),
        })
    }

    fn default_value() -> Option<Value> {
        Some(Value::Bool(false))
    }
}

impl PropertyEditor for BooleanEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn view(&self) -> EditorView {
        self.base.view(Widget::Toggle {
            checked: self.checked(),
        })
    }

    fn apply(&mut self, input: EditorInput) -> DrawResult {
        match input {
            EditorInput::Toggle(checked)
                if checked != self.checked() || !self.base.property().has_value() =>
            {
                self.base.property().set_value(Some(Value::Bool(checked)));
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
